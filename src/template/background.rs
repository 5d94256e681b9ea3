use kurbo::Affine;
use resvg::tiny_skia;

use crate::{
    assets::{decode::decode_image, loader::ImageLoader},
    foundation::{
        color::Rgba8,
        core::StripCapacity,
        error::{StripError, StripResult},
    },
    render::{surface::Surface, text::TextRasterizer},
    template::{
        model::{Template, TemplateKind},
        recipes::{RecipeCtx, recipe_for},
    },
};

/// Neutral fill used when a background image cannot be loaded.
pub const IMAGE_FALLBACK_COLOR: Rgba8 = Rgba8::rgb(0xcc, 0xcc, 0xcc);

/// Collaborators a background needs besides the surface.
#[derive(Clone, Copy)]
pub struct BackgroundEnv<'a> {
    pub loader: &'a dyn ImageLoader,
    pub text: &'a TextRasterizer,
}

/// Clear the surface and paint `template` over the whole `width x height` strip.
///
/// Image templates load their resource through `env.loader`; a failed load falls back to a flat
/// neutral fill and still resolves `Ok`.
pub async fn draw_background(
    surface: &mut Surface,
    template: &Template,
    width: u32,
    height: u32,
    capacity: StripCapacity,
    env: BackgroundEnv<'_>,
) -> StripResult<()> {
    surface.clear();

    if let Some(recipe) = recipe_for(template.kind) {
        let ctx = RecipeCtx {
            template,
            width,
            height,
            text: env.text,
        };
        return recipe(surface, &ctx);
    }

    debug_assert_eq!(template.kind, TemplateKind::Image);
    match load_image(template, capacity, env.loader).await {
        Ok(image) => {
            let sx = f64::from(width) / f64::from(image.width());
            let sy = f64::from(height) / f64::from(image.height());
            let bounds = surface.bounds();
            surface.fill_shape_with_image(&bounds, &image, Affine::scale_non_uniform(sx, sy));
        }
        Err(e) => {
            tracing::warn!(template = %template.id, error = %e, "background image unavailable, using fallback fill");
            surface.fill(IMAGE_FALLBACK_COLOR);
        }
    }
    Ok(())
}

async fn load_image(
    template: &Template,
    capacity: StripCapacity,
    loader: &dyn ImageLoader,
) -> StripResult<tiny_skia::Pixmap> {
    let reference = template.image_reference(capacity).ok_or_else(|| {
        StripError::validation(format!("template \"{}\" has no image reference", template.id))
    })?;
    let bytes = loader.load(reference).await?;
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| StripError::decode(format!("background decode task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/template/background.rs"]
mod tests;
