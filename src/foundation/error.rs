/// Convenience result type used across photostrip.
pub type StripResult<T> = Result<T, StripError>;

/// Top-level error taxonomy used by the strip pipeline.
///
/// The compositor itself never surfaces these to callers: decode and render failures are turned
/// into placeholder or error-overlay imagery at the compositor boundary.
#[derive(thiserror::Error, Debug)]
pub enum StripError {
    /// Invalid caller-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A captured frame or template image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Surface allocation or drawing failed.
    #[error("render error: {0}")]
    Render(String),

    /// Camera grab or countdown failure.
    #[error("capture error: {0}")]
    Capture(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripError {
    /// Build a [`StripError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StripError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`StripError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StripError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`StripError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
