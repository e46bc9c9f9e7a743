use thiserror::Error;

/// Failure kinds of the AI orchestration core.
///
/// These never cross the display boundary: [`crate::ConversationSession::send`]
/// and [`crate::RoomAnalyzer::analyze`] map each kind to a fixed user-facing
/// fallback. The `try_*` variants expose them so callers and tests can tell
/// them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    #[error("No provider credential configured")]
    ConfigurationAbsent,

    #[error("Client construction failed: {0}")]
    ClientConstructionFailed(String),

    #[error("Session creation failed: {0}")]
    SessionCreationFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AdvisorError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::ClientConstructionFailed(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::SessionCreationFailed(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn provider(status: u16, msg: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for the two kinds that permanently disable AI features.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationAbsent | Self::ClientConstructionFailed(_)
        )
    }

    /// True when the provider answered but the body was unusable.
    pub fn is_bad_response(&self) -> bool {
        matches!(self, Self::EmptyResponse | Self::MalformedResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_kinds() {
        assert!(AdvisorError::ConfigurationAbsent.is_unavailable());
        assert!(AdvisorError::construction("tls").is_unavailable());
        assert!(!AdvisorError::transport("refused").is_unavailable());
    }

    #[test]
    fn provider_error_message_includes_status() {
        let err = AdvisorError::provider(429, "RESOURCE_EXHAUSTED: quota");
        assert_eq!(
            err.to_string(),
            "Provider returned 429: RESOURCE_EXHAUSTED: quota"
        );
    }
}
