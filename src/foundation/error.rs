/// Convenience result type used across Deckwright.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by authoring APIs.
///
/// Every variant is an author-visible, fatal error: once a deck script
/// finishes composing its timeline without raising one of these, there is
/// nothing left for the core to fail at.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Invalid user-provided configuration or option values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Canvas registry misuse: unknown or duplicate keys.
    #[error("registry error: {0}")]
    Registry(String),

    /// Malformed animation payloads or targets.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DeckError::Registry`] value.
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Build a [`DeckError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`DeckError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
