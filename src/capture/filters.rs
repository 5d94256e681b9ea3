//! Capture-time color filters.
//!
//! Each filter is a short chain of CSS filter functions applied to straight-alpha RGBA; alpha is
//! left untouched. Channel values are clamped to `[0, 1]` after every function, as a browser
//! does when it chains them.

use image::RgbaImage;

/// Filters offered in the capture menu.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Bright,
    Contrast,
    Warm,
    Cool,
    Blur,
    Invert,
    Mono,
    Vivid,
}

impl FilterKind {
    /// Menu order.
    pub const ALL: [FilterKind; 11] = [
        Self::None,
        Self::Grayscale,
        Self::Sepia,
        Self::Bright,
        Self::Contrast,
        Self::Warm,
        Self::Cool,
        Self::Blur,
        Self::Invert,
        Self::Mono,
        Self::Vivid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Bright => "bright",
            Self::Contrast => "contrast",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Blur => "blur",
            Self::Invert => "invert",
            Self::Mono => "mono",
            Self::Vivid => "vivid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Normal",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Bright => "Bright",
            Self::Contrast => "Contrast",
            Self::Warm => "Warm",
            Self::Cool => "Cool Tone",
            Self::Blur => "Blur",
            Self::Invert => "Invert",
            Self::Mono => "Monochrome",
            Self::Vivid => "Vivid",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::None => "\u{1f7e2}",
            Self::Grayscale => "\u{26ab}",
            Self::Sepia => "\u{1f4dc}",
            Self::Bright => "\u{2600}\u{fe0f}",
            Self::Contrast => "\u{1f313}",
            Self::Warm => "\u{1f525}",
            Self::Cool => "\u{1f9ca}",
            Self::Blur => "\u{1f32b}\u{fe0f}",
            Self::Invert => "\u{1f308}",
            Self::Mono => "\u{26aa}",
            Self::Vivid => "\u{1f31f}",
        }
    }

    /// Look up a filter by its menu value; unknown values select no filter.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .unwrap_or_default()
    }

    fn ops(self) -> Vec<FilterOp> {
        match self {
            Self::None => vec![],
            Self::Grayscale => vec![FilterOp::grayscale()],
            Self::Sepia => vec![FilterOp::sepia()],
            Self::Bright => vec![FilterOp::brightness(1.25)],
            Self::Contrast => vec![FilterOp::contrast(1.5)],
            Self::Warm => vec![FilterOp::hue_rotate(-15.0), FilterOp::saturate(1.5)],
            Self::Cool => vec![FilterOp::hue_rotate(15.0), FilterOp::saturate(1.5)],
            Self::Blur => vec![FilterOp::Blur { sigma: 2.0 }],
            Self::Invert => vec![FilterOp::Invert],
            Self::Mono => vec![FilterOp::grayscale(), FilterOp::contrast(1.25)],
            Self::Vivid => vec![FilterOp::saturate(2.0), FilterOp::contrast(1.25)],
        }
    }

    /// Apply the filter chain to `img`.
    pub fn apply(self, img: RgbaImage) -> RgbaImage {
        self.ops().into_iter().fold(img, |img, op| op.apply(img))
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FilterOp {
    /// Row-major 3x3 matrix on linear-in-value RGB.
    Matrix([[f32; 3]; 3]),
    /// `v * slope + intercept` per channel.
    Linear { slope: f32, intercept: f32 },
    Invert,
    Blur { sigma: f32 },
}

impl FilterOp {
    fn grayscale() -> Self {
        let row = [0.2126, 0.7152, 0.0722];
        Self::Matrix([row, row, row])
    }

    fn sepia() -> Self {
        Self::Matrix([
            [0.393, 0.769, 0.189],
            [0.349, 0.686, 0.168],
            [0.272, 0.534, 0.131],
        ])
    }

    fn brightness(amount: f32) -> Self {
        Self::Linear {
            slope: amount,
            intercept: 0.0,
        }
    }

    fn contrast(amount: f32) -> Self {
        Self::Linear {
            slope: amount,
            intercept: 0.5 - 0.5 * amount,
        }
    }

    fn saturate(s: f32) -> Self {
        Self::Matrix([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ])
    }

    fn hue_rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::Matrix([
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
            ],
            [
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
            ],
            [
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
            ],
        ])
    }

    fn apply(self, mut img: RgbaImage) -> RgbaImage {
        match self {
            Self::Blur { sigma } => return image::imageops::blur(&img, sigma),
            Self::Matrix(m) => {
                for px in img.pixels_mut() {
                    let [r, g, b] = channels(px.0);
                    let out = [
                        m[0][0] * r + m[0][1] * g + m[0][2] * b,
                        m[1][0] * r + m[1][1] * g + m[1][2] * b,
                        m[2][0] * r + m[2][1] * g + m[2][2] * b,
                    ];
                    store(&mut px.0, out);
                }
            }
            Self::Linear { slope, intercept } => {
                for px in img.pixels_mut() {
                    let out = channels(px.0).map(|v| v * slope + intercept);
                    store(&mut px.0, out);
                }
            }
            Self::Invert => {
                for px in img.pixels_mut() {
                    let out = channels(px.0).map(|v| 1.0 - v);
                    store(&mut px.0, out);
                }
            }
        }
        img
    }
}

#[inline]
fn channels(px: [u8; 4]) -> [f32; 3] {
    [px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0)
}

#[inline]
fn store(px: &mut [u8; 4], rgb: [f32; 3]) {
    for (dst, v) in px.iter_mut().zip(rgb) {
        *dst = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/filters.rs"]
mod tests;
