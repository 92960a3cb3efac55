/// Convenience result type used across blobscape.
pub type BlobscapeResult<T> = Result<T, BlobscapeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum BlobscapeError {
    /// Malformed palette, out-of-range counts or sizes, unreadable config files.
    #[error("config error: {0}")]
    Config(String),

    /// Hardware capability detection failed. Contained by [`crate::detect_tier`].
    #[error("capability error: {0}")]
    Capability(String),

    /// The display surface or its drawing context is unavailable.
    #[error("surface error: {0}")]
    Surface(String),

    /// Per-frame draw preparation failed (outline parse, gradient raster).
    #[error("render error: {0}")]
    Render(String),
}

impl BlobscapeError {
    /// Build a [`BlobscapeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`BlobscapeError::Capability`] value.
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    /// Build a [`BlobscapeError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`BlobscapeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
