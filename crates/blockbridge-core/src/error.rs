//! Error types for bridge construction.
//!
//! Errors only surface while building the bridge. The render and UI paths
//! never return errors: an absent engine or editor turns every call into a
//! no-op instead.

/// Errors that can occur while constructing a bridge.
#[derive(Debug)]
pub enum BridgeError {
    /// The engine factory could not allocate or initialize the engine.
    EngineCreation(String),
    /// The editor factory could not build an editor.
    EditorCreation(String),
    /// The host reported an unusable sample rate.
    InvalidSampleRate(f64),
    /// The plugin has no engine, so no parameter view can be handed out.
    EngineUnavailable,
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EngineCreation(msg) => write!(f, "engine creation failed: {msg}"),
            Self::EditorCreation(msg) => write!(f, "editor creation failed: {msg}"),
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {rate}"),
            Self::EngineUnavailable => write!(f, "engine unavailable"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Result type for bridge construction.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
