//! Error types for the player and its collaborators.

/// Failure reported by an [`AnimationEngine`](crate::AnimationEngine) call.
///
/// Engines are opaque; all the core needs is a human-readable reason.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EngineError {
    pub reason: String,
}

impl EngineError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Error type for player lifecycle, content switching and lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayerError {
    /// A required argument was missing or empty
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The animation engine rejected an operation
    #[error("Engine {operation} failed: {source}")]
    Engine {
        operation: &'static str,
        #[source]
        source: EngineError,
    },

    /// The render backend could not allocate the output texture
    #[error("Texture allocation failed for {width}x{height}")]
    TextureAllocation { width: u32, height: u32 },

    /// No marker with the requested name exists in the catalog
    #[error("Marker not found: {name}")]
    MarkerNotFound { name: String },

    /// The player has been unloaded
    #[error("Player is not loaded")]
    NotLoaded,

    /// Reading an asset from disk failed
    #[error("IO error: {reason}")]
    Io { reason: String },

    /// Player configuration could not be parsed
    #[error("Config error: {reason}")]
    Config { reason: String },
}

impl PlayerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn engine(operation: &'static str, source: EngineError) -> Self {
        Self::Engine { operation, source }
    }

    /// Check if the player is still usable after this error.
    ///
    /// Load failures never produce a player, so only errors raised by an
    /// already-loaded player count as recoverable.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MarkerNotFound { .. } | Self::Engine { .. } | Self::TextureAllocation { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::Config { .. } => "validation",
            Self::Engine { .. } => "engine",
            Self::TextureAllocation { .. } => "backend",
            Self::MarkerNotFound { .. } => "marker",
            Self::NotLoaded => "player",
            Self::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for PlayerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
