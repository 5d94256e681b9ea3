use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use futures::future::{BoxFuture, join_all};
use kurbo::Point;
use resvg::tiny_skia;

use crate::{
    assets::{
        decode::decode_image,
        loader::{FsImageLoader, ImageLoader},
    },
    compose::{
        inputs::{CapturedFrame, StripInputs},
        placeholder::{
            draw_empty_caption, draw_error_overlay, error_placeholder, fallback_error_png,
        },
        preview::StripPreview,
    },
    config::BoothOpts,
    foundation::{
        color::Rgba8,
        core::{FRAME_CORNER_RADIUS, StripConfig},
        error::{StripError, StripResult},
    },
    layout::frames::frame_layout,
    render::{
        cover::draw_cover,
        surface::Surface,
        text::{TextRasterizer, TextRun},
    },
    template::background::{BackgroundEnv, draw_background},
};

/// Glyph size of emoji stamps.
pub const STAMP_SIZE: f64 = 24.0;
/// Caption font size.
pub const CAPTION_SIZE: f64 = 14.0;
/// Distance of the caption baseline from the bottom edge.
pub const CAPTION_BOTTOM_OFFSET: f64 = 20.0;

/// Something that turns an input snapshot into a preview.
///
/// The regeneration controller only sees this seam.
pub trait StripRenderer: Send + Sync + 'static {
    fn render(&self, inputs: StripInputs) -> BoxFuture<'static, StripPreview>;
}

/// Flattens background, frames, stamps and caption into one PNG strip.
///
/// Cloning is cheap and clones share the run counter.
#[derive(Clone)]
pub struct Compositor {
    loader: Arc<dyn ImageLoader>,
    text: TextRasterizer,
    corner_radius: f64,
    runs: Arc<AtomicU64>,
    #[cfg(test)]
    fail_after_frames: bool,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("text", &self.text)
            .field("corner_radius", &self.corner_radius)
            .field("runs", &self.runs.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Compositor {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            text: TextRasterizer::system(),
            corner_radius: FRAME_CORNER_RADIUS,
            runs: Arc::new(AtomicU64::new(0)),
            #[cfg(test)]
            fail_after_frames: false,
        }
    }

    /// Compositor resolving template images under `opts.assets_root`.
    pub fn from_opts(opts: &BoothOpts) -> Self {
        Self::new(Arc::new(FsImageLoader::new(&opts.assets_root)))
            .with_text(TextRasterizer::with_fonts_dir(opts.fonts_dir.as_deref()))
            .with_corner_radius(opts.corner_radius)
    }

    pub fn with_text(mut self, text: TextRasterizer) -> Self {
        self.text = text;
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Render one strip. Never fails: undecodable frames become placeholders and any other
    /// failure becomes the full-surface error image.
    #[tracing::instrument(
        name = "compose",
        skip_all,
        fields(
            capacity = %inputs.config.capacity,
            frames = inputs.frames.len(),
            stamps = inputs.stamps.len(),
            template = %inputs.template.id,
        )
    )]
    pub async fn compose(&self, inputs: &StripInputs) -> StripPreview {
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let StripConfig { width, height, .. } = inputs.config;
        tracing::debug!(run, "compositor run started");

        let mut surface = match Surface::new(width, height) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(run, error = %e, "surface allocation failed");
                return fallback_preview(width, height, run);
            }
        };

        if let Err(e) = self.paint(&mut surface, inputs).await {
            tracing::error!(run, error = %e, "strip rendering failed, showing error image");
            draw_error_overlay(&mut surface, &self.text);
        }

        match surface.encode_png() {
            Ok(png) => {
                tracing::debug!(run, bytes = png.len(), "compositor run finished");
                StripPreview::new(width, height, run, png)
            }
            Err(e) => {
                tracing::error!(run, error = %e, "preview encoding failed");
                fallback_preview(width, height, run)
            }
        }
    }

    async fn paint(&self, surface: &mut Surface, inputs: &StripInputs) -> StripResult<()> {
        let config = inputs.config;
        let (w, h) = (f64::from(config.width), f64::from(config.height));

        draw_background(
            surface,
            &inputs.template,
            config.width,
            config.height,
            config.capacity,
            BackgroundEnv {
                loader: self.loader.as_ref(),
                text: &self.text,
            },
        )
        .await?;

        if inputs.frames.is_empty() {
            return draw_empty_caption(surface, config, &inputs.template, &self.text);
        }

        let capacity = config.capacity.count();
        if inputs.frames.len() > capacity {
            tracing::debug!(
                ignored = inputs.frames.len() - capacity,
                "frames beyond strip capacity are not drawn"
            );
        }
        let frames = &inputs.frames[..inputs.frames.len().min(capacity)];

        // Gather every decode first; drawing happens afterwards in index order.
        let decoded = decode_frames(frames).await;
        let mut placeholder: Option<tiny_skia::Pixmap> = None;
        let mut images = Vec::with_capacity(decoded.len());
        for (index, result) in decoded.into_iter().enumerate() {
            match result {
                Ok(img) => images.push(img),
                Err(e) => {
                    tracing::warn!(index, error = %e, "frame failed to decode, using placeholder");
                    let p = match &placeholder {
                        Some(p) => p.clone(),
                        None => {
                            let p = error_placeholder(config, &self.text)?;
                            placeholder = Some(p.clone());
                            p
                        }
                    };
                    images.push(p);
                }
            }
        }

        for (index, img) in images.iter().enumerate() {
            let rect = frame_layout(w, h, config.capacity, index);
            draw_cover(surface, img, rect, self.corner_radius);
        }

        #[cfg(test)]
        if self.fail_after_frames {
            return Err(StripError::render("forced failure after frames"));
        }

        let stamps: Vec<TextRun> = inputs
            .stamps
            .iter()
            .map(|s| {
                TextRun::centered(s.glyph.clone(), s.clamped(w, h), STAMP_SIZE, Rgba8::BLACK)
            })
            .collect();
        self.text.draw(surface, &stamps)?;

        if !inputs.caption.is_empty() {
            let ink = if inputs.template.is_dark() {
                Rgba8::WHITE
            } else {
                Rgba8::BLACK
            };
            let caption = TextRun::centered(
                inputs.caption.clone(),
                Point::new(w / 2.0, h - CAPTION_BOTTOM_OFFSET),
                CAPTION_SIZE,
                ink,
            )
            .bold()
            .on_baseline();
            self.text.draw(surface, &[caption])?;
        }

        Ok(())
    }
}

impl StripRenderer for Compositor {
    fn render(&self, inputs: StripInputs) -> BoxFuture<'static, StripPreview> {
        let this = self.clone();
        Box::pin(async move { this.compose(&inputs).await })
    }
}

/// Decode all frames concurrently. Each entry settles on its own; one failure does not affect the
/// others.
async fn decode_frames(frames: &[CapturedFrame]) -> Vec<StripResult<tiny_skia::Pixmap>> {
    let tasks = frames.iter().cloned().map(|frame| async move {
        tokio::task::spawn_blocking(move || decode_image(frame.bytes()))
            .await
            .map_err(|e| StripError::decode(format!("frame decode task failed: {e}")))?
    });
    join_all(tasks).await
}

fn fallback_preview(width: u32, height: u32, run: u64) -> StripPreview {
    let png = fallback_error_png(width, height).unwrap_or_default();
    StripPreview::new(width.max(1), height.max(1), run, png)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
