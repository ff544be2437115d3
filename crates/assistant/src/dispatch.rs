use std::sync::Arc;

use tracing::warn;

use suplo_core::conversation::ConversationMessage;

use crate::llm::{CompletionClient, CompletionError};
use crate::router::ProviderRouter;

/// Resolves a backend for the caller and performs the outbound completion.
///
/// Fallback is an explicit two-step resolution: when the stored preference
/// does not parse into the supported set, the dispatcher retries once
/// against the precomputed default with the caller identity cleared. There
/// is no re-entry; termination is structural.
pub struct CompletionDispatcher {
    router: ProviderRouter,
    client: Arc<dyn CompletionClient>,
}

impl CompletionDispatcher {
    pub fn new(router: ProviderRouter, client: Arc<dyn CompletionClient>) -> Self {
        Self { router, client }
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    pub async fn dispatch(
        &self,
        user_id: &str,
        messages: &[ConversationMessage],
    ) -> Result<String, CompletionError> {
        let backend = match self.router.resolve(user_id).await {
            Ok(backend) => backend,
            Err(invalid) => {
                warn!(
                    event_name = "assistant.dispatch.backend_fallback",
                    requested = %invalid.requested,
                    fallback = %self.router.default_backend(),
                    "stored backend is outside the supported set; dispatching against the default with caller identity cleared"
                );
                self.router.default_backend()
            }
        };

        self.client.complete(backend, messages).await
    }
}
