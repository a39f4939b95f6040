use crate::error::Result;
use crate::hooks::{LlmRequest, LlmResponse};
use async_trait::async_trait;

/// Abstract interface for the model that answers an agent's requests
///
/// Implementations wrap a concrete provider. The runner calls `generate` once per model
/// turn with the full conversation so far and the tools the agent exposes.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Produce the next model turn for `request`
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse>;
}
