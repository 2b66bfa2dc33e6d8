/// Convenience result type used across Deckle.
pub type DeckleResult<T> = Result<T, DeckleError>;

/// Top-level error taxonomy used by editor APIs.
///
/// Mutations on the document model never error: references to missing slides
/// or overlays are silent no-ops, because asynchronous renderer callbacks can
/// race a deletion. Errors are reserved for genuinely invalid input (bad hex
/// colors, malformed image sources) and for asset/render failures the caller
/// may want to surface.
#[derive(thiserror::Error, Debug)]
pub enum DeckleError {
    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or decoding an asset (background images, fonts).
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while rasterizing a stage or encoding an export image.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckleError {
    /// Build a [`DeckleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DeckleError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`DeckleError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
