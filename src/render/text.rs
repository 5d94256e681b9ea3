use std::{
    fmt::Write as _,
    path::Path,
    sync::{Arc, OnceLock},
};

use crate::{
    foundation::{
        color::Rgba8,
        core::Point,
        error::{StripError, StripResult},
    },
    render::surface::Surface,
};

/// Vertical placement of a run relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// The anchor is the vertical centre of the glyphs.
    Middle,
    /// The anchor lies on the alphabetic baseline.
    Alphabetic,
}

/// Horizontal placement of a run relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

/// One line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub at: Point,
    pub size: f64,
    pub bold: bool,
    pub color: Rgba8,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextRun {
    pub fn centered(text: impl Into<String>, at: Point, size: f64, color: Rgba8) -> Self {
        Self {
            text: text.into(),
            at,
            size,
            bold: false,
            color,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }

    /// Run starting at `at` on the alphabetic baseline.
    pub fn starting_at(text: impl Into<String>, at: Point, size: f64, color: Rgba8) -> Self {
        Self {
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
            ..Self::centered(text, at, size, color)
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn on_baseline(mut self) -> Self {
        self.baseline = TextBaseline::Alphabetic;
        self
    }
}

/// Draws glyphs (captions, labels, stamps) through the SVG text stack.
///
/// A batch of runs becomes one SVG document sized like the target surface, so runs drawn in one
/// call layer in slice order.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::system()
    }
}

impl TextRasterizer {
    /// Rasterizer over the system fonts. The font database is loaded once per process.
    pub fn system() -> Self {
        static SYSTEM_FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
        let fontdb = SYSTEM_FONTS.get_or_init(|| build_fontdb(None)).clone();
        Self { fontdb }
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` in `fonts_dir`.
    pub fn with_fonts_dir(fonts_dir: Option<&Path>) -> Self {
        match fonts_dir {
            None => Self::system(),
            Some(dir) => Self {
                fontdb: build_fontdb(Some(dir)),
            },
        }
    }

    pub fn has_fonts(&self) -> bool {
        !self.fontdb.is_empty()
    }

    pub fn draw(&self, surface: &mut Surface, runs: &[TextRun]) -> StripResult<()> {
        let runs: Vec<&TextRun> = runs.iter().filter(|r| !r.text.is_empty()).collect();
        if runs.is_empty() {
            return Ok(());
        }

        let svg = runs_to_svg(surface.width(), surface.height(), &runs);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| StripError::render(format!("parse text svg: {e}")))?;
        surface.render_svg(&tree);
        Ok(())
    }
}

fn runs_to_svg(width: u32, height: u32, runs: &[&TextRun]) -> String {
    let mut svg = String::with_capacity(256 + runs.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for run in runs {
        let baseline = match run.baseline {
            TextBaseline::Middle => r#" dominant-baseline="central""#,
            TextBaseline::Alphabetic => "",
        };
        let anchor = match run.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
        };
        let opacity = if run.color.a == 255 {
            String::new()
        } else {
            format!(r#" fill-opacity="{:.4}""#, f64::from(run.color.a) / 255.0)
        };
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{size}" font-weight="{weight}" fill="{fill}"{opacity} text-anchor="{anchor}"{baseline}>{text}</text>"#,
            x = run.at.x,
            y = run.at.y,
            size = run.size,
            weight = if run.bold { "bold" } else { "normal" },
            fill = run.color.with_alpha(1.0).to_hex(),
            text = escape_xml(&run.text),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn build_fontdb(fonts_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = fonts_dir {
        load_fonts_from_dir(&mut db, dir);
    }
    tracing::debug!(faces = db.len(), "font database loaded");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "fonts directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

fn fontdb_family(family: &usvg::FontFamily) -> usvg::fontdb::Family<'_> {
    use usvg::fontdb::Family;
    match family {
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Named(s) => Family::Name(s),
    }
}

fn fontdb_stretch(stretch: usvg::FontStretch) -> usvg::fontdb::Stretch {
    use usvg::fontdb::Stretch;
    match stretch {
        usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
        usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
        usvg::FontStretch::Condensed => Stretch::Condensed,
        usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
        usvg::FontStretch::Normal => Stretch::Normal,
        usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
        usvg::FontStretch::Expanded => Stretch::Expanded,
        usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
        usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
    }
}

fn fontdb_style(style: usvg::FontStyle) -> usvg::fontdb::Style {
    match style {
        usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
        usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
        usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
    }
}

/// Requested families first, then the generic sans-serif, serif and monospace fallbacks.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<_> = font.families().iter().map(fontdb_family).collect();
            families.extend([
                usvg::fontdb::Family::SansSerif,
                usvg::fontdb::Family::Serif,
                usvg::fontdb::Family::Monospace,
            ]);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: fontdb_stretch(font.stretch()),
                style: fontdb_style(font.style()),
            };
            // Any face beats dropping the run.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
