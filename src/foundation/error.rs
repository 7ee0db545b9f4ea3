/// Convenience result type used across slidebox.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by authoring, layout and render APIs.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Malformed selector or size syntax, unknown image extension, invalid option values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Relative insertion referenced a node that is not a child of the stated parent.
    #[error("ordering error: {0}")]
    Ordering(String),

    /// Named style is absent from the box's style chain.
    #[error("style not found: {0}")]
    StyleNotFound(String),

    /// Missing or undecodable resource (image, vector document, external conversion).
    #[error("resource error: {0}")]
    Resource(String),

    /// Geometry could not be resolved (negative inner sizes, premature lazy evaluation).
    #[error("layout error: {0}")]
    Layout(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`DeckError::Ordering`] value.
    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::Ordering(msg.into())
    }

    /// Build a [`DeckError::StyleNotFound`] value.
    pub fn style_not_found(name: impl Into<String>) -> Self {
        Self::StyleNotFound(name.into())
    }

    /// Build a [`DeckError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`DeckError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
