//! Photostrip composes photobooth strips.
//!
//! Captured frames, a background template, emoji stamps and a caption are flattened into a single
//! PNG strip of fixed size. The pieces:
//!
//! - [`StripStore`] holds the current [`StripInputs`] and publishes every change
//! - [`RegenController`] debounces those changes and re-runs the [`Compositor`]
//! - [`PhotoBooth`] adds the countdown capture flow on top
#![forbid(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod compose;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod session;
pub mod template;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{FrameRect, StripCapacity, StripConfig};
pub use crate::foundation::error::{StripError, StripResult};

pub use crate::assets::loader::{FsImageLoader, ImageLoader, MemoryImageLoader};
pub use crate::capture::booth::PhotoBooth;
pub use crate::capture::filters::FilterKind;
pub use crate::capture::pipeline::{CameraSource, CapturePipeline, CaptureSettings};
pub use crate::compose::compositor::{Compositor, StripRenderer};
pub use crate::compose::inputs::{CapturedFrame, EmojiStamp, StripInputs};
pub use crate::compose::preview::StripPreview;
pub use crate::config::BoothOpts;
pub use crate::layout::frames::frame_layout;
pub use crate::render::text::TextRasterizer;
pub use crate::session::regen::{RegenController, RegenState};
pub use crate::session::store::StripStore;
pub use crate::template::catalog::TemplateCatalog;
pub use crate::template::model::{ColorSpec, ImageRefs, Template, TemplateKind};
