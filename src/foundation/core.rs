use crate::foundation::error::{StripError, StripResult};

pub use kurbo::{Point, Rect, Vec2};

/// Width / height ratio of every frame slot.
pub const FRAME_ASPECT_RATIO: f64 = 4.0 / 3.0;
/// Outer margin, and the gap between columns/rows of the two-column layout.
pub const FRAME_MARGIN: f64 = 10.0;
/// Vertical gap between frames of the single-column layout.
pub const FRAME_GAP: f64 = 10.0;
/// Default corner radius of the rounded frame clip.
pub const FRAME_CORNER_RADIUS: f64 = 12.0;
/// Stamps are clamped this far inside every strip edge.
pub const STAMP_INSET: f64 = 12.0;

/// Number of frame slots on a strip. Only the two physical strip formats exist.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum StripCapacity {
    /// Single column of 4 frames.
    #[default]
    Four,
    /// Two columns, 4 rows.
    Eight,
}

impl StripCapacity {
    pub fn count(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    pub fn columns(self) -> usize {
        match self {
            Self::Four => 1,
            Self::Eight => 2,
        }
    }

    pub fn config(self) -> StripConfig {
        StripConfig::for_capacity(self)
    }
}

impl TryFrom<u32> for StripCapacity {
    type Error = StripError;

    fn try_from(v: u32) -> StripResult<Self> {
        match v {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(StripError::validation(format!(
                "strip capacity must be 4 or 8, got {other}"
            ))),
        }
    }
}

impl From<StripCapacity> for u32 {
    fn from(c: StripCapacity) -> u32 {
        c.count() as u32
    }
}

impl std::fmt::Display for StripCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Fixed pixel size of a strip for a given capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StripConfig {
    pub capacity: StripCapacity,
    pub width: u32,
    pub height: u32,
}

impl StripConfig {
    pub fn for_capacity(capacity: StripCapacity) -> Self {
        let (width, height) = match capacity {
            // 2x6 inch strip at 90 DPI
            StripCapacity::Four => (180, 600),
            StripCapacity::Eight => (370, 600),
        };
        Self {
            capacity,
            width,
            height,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self::for_capacity(StripCapacity::default())
    }
}

/// A frame slot in strip pixel space. Derived from the layout calculator, never stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    pub fn overlaps(self, other: FrameRect) -> bool {
        let a = self.to_rect();
        let b = other.to_rect();
        a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
    }
}
