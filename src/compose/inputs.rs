use std::sync::Arc;

use crate::{
    foundation::core::{Point, STAMP_INSET, StripConfig},
    template::{catalog::default_template, model::Template},
};

/// One captured photo as encoded image bytes (PNG from the capture pipeline).
///
/// Cloning shares the bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CapturedFrame(Arc<[u8]>);

impl CapturedFrame {
    pub fn from_encoded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CapturedFrame({} bytes)", self.0.len())
    }
}

/// A decorative glyph placed in strip pixel space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmojiStamp {
    pub x: f64,
    pub y: f64,
    pub glyph: String,
}

impl EmojiStamp {
    pub fn new(glyph: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            glyph: glyph.into(),
        }
    }

    /// Position kept [`STAMP_INSET`] pixels inside every edge of a `width x height` strip.
    pub fn clamped(&self, width: f64, height: f64) -> Point {
        // `max` first so NaN lands on the inset.
        Point::new(
            self.x.max(STAMP_INSET).min(width - STAMP_INSET),
            self.y.max(STAMP_INSET).min(height - STAMP_INSET),
        )
    }
}

/// Everything one compositor run depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct StripInputs {
    pub config: StripConfig,
    pub frames: Vec<CapturedFrame>,
    pub stamps: Vec<EmojiStamp>,
    pub caption: String,
    pub template: Template,
}

impl Default for StripInputs {
    fn default() -> Self {
        Self {
            config: StripConfig::default(),
            frames: Vec::new(),
            stamps: Vec::new(),
            caption: String::new(),
            template: default_template(),
        }
    }
}
