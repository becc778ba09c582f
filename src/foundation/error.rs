/// Convenience result type used across the trailer crate.
pub type TrailerResult<T> = Result<T, TrailerError>;

/// Top-level error taxonomy used by the timeline, renderer and encoder.
#[derive(thiserror::Error, Debug)]
pub enum TrailerError {
    /// Invalid scene, cue or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while validating or sampling animation channels.
    #[error("animation error: {0}")]
    Animation(String),

    /// Presenter used outside of its mount lifetime.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Errors while turning an evaluated frame into pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors from the external `ffmpeg` encoder process.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrailerError {
    /// Build a [`TrailerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TrailerError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TrailerError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`TrailerError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TrailerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TrailerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TrailerError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
