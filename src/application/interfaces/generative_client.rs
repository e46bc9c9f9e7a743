use async_trait::async_trait;

use crate::domain::{AdvisorError, GenerateRequest};

/// Sends a generation request to a hosted model and returns the reply text.
///
/// Implementors own transport, serialization and the model identifier.
/// An empty string is a valid return: callers decide whether that counts as
/// a failure.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdvisorError>;

    fn model(&self) -> &str;
}
