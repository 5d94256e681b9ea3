use serde::{Deserialize, Serialize};

use crate::foundation::{color::Rgba8, core::StripCapacity};

/// Background recipe family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Solid,
    Lined,
    Dotted,
    Grid,
    Gradient,
    Bordered,
    PatternStars,
    Diagonal,
    CanvasTexture,
    Paper,
    Retro,
    DotBorder,
    Image,
    /// Any kind this build does not know; rendered as a plain white strip.
    #[serde(other)]
    Unknown,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 13] = [
        Self::Solid,
        Self::Lined,
        Self::Dotted,
        Self::Grid,
        Self::Gradient,
        Self::Bordered,
        Self::PatternStars,
        Self::Diagonal,
        Self::CanvasTexture,
        Self::Paper,
        Self::Retro,
        Self::DotBorder,
        Self::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Lined => "lined",
            Self::Dotted => "dotted",
            Self::Grid => "grid",
            Self::Gradient => "gradient",
            Self::Bordered => "bordered",
            Self::PatternStars => "pattern-stars",
            Self::Diagonal => "diagonal",
            Self::CanvasTexture => "canvas-texture",
            Self::Paper => "paper",
            Self::Retro => "retro",
            Self::DotBorder => "dot-border",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image references of an `image` template.
///
/// The capacity-specific variants win over the generic `src` when present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eight: Option<String>,
}

impl ImageRefs {
    pub fn for_capacity(&self, capacity: StripCapacity) -> Option<&str> {
        let specific = match capacity {
            StripCapacity::Four => self.four.as_deref(),
            StripCapacity::Eight => self.eight.as_deref(),
        };
        specific
            .filter(|s| !s.is_empty())
            .or(self.src.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Color parameters of a template.
///
/// JSON forms: `"#rrggbb"`, `["#top", "#bottom"]`, or `{ "src": .., "four": .., "eight": .. }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Solid(Rgba8),
    Gradient([Rgba8; 2]),
    Image(ImageRefs),
}

impl ColorSpec {
    /// Fill color for recipes that paint a single base color.
    pub fn base_color(&self) -> Rgba8 {
        match self {
            Self::Solid(c) => *c,
            Self::Gradient([top, _]) => *top,
            Self::Image(_) => Rgba8::WHITE,
        }
    }
}

/// A named background recipe plus its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub label: String,
    pub kind: TemplateKind,
    pub color: ColorSpec,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: TemplateKind,
        color: ColorSpec,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            color,
        }
    }

    pub fn solid(id: &str, label: &str, kind: TemplateKind, hex: &str) -> Self {
        Self::new(id, label, kind, ColorSpec::Solid(hex_or_white(hex)))
    }

    pub fn gradient(id: &str, label: &str, top: &str, bottom: &str) -> Self {
        Self::new(
            id,
            label,
            TemplateKind::Gradient,
            ColorSpec::Gradient([hex_or_white(top), hex_or_white(bottom)]),
        )
    }

    /// Text drawn on this background should be white.
    pub fn is_dark(&self) -> bool {
        match &self.color {
            ColorSpec::Solid(c) => c.is_dark(),
            ColorSpec::Gradient(stops) => stops.iter().any(|c| c.is_dark()),
            ColorSpec::Image(_) => false,
        }
    }

    pub fn image_reference(&self, capacity: StripCapacity) -> Option<&str> {
        match &self.color {
            ColorSpec::Image(refs) => refs.for_capacity(capacity),
            _ => None,
        }
    }
}

fn hex_or_white(hex: &str) -> Rgba8 {
    Rgba8::parse_hex(hex).unwrap_or(Rgba8::WHITE)
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
