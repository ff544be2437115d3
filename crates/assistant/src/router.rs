use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use suplo_core::config::Backend;

/// Key-value store for per-user backend preferences.
///
/// The store holds raw backend names rather than the parsed enum so a
/// durable implementation can carry values written by an older build;
/// `ProviderRouter::resolve` revalidates on every read.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<String>;
    async fn set(&self, user_id: &str, backend: &str);
}

/// Process-wide, in-memory preference map. Entries are independently owned
/// per user id; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: &str) -> Option<String> {
        self.entries.read().await.get(user_id).cloned()
    }

    async fn set(&self, user_id: &str, backend: &str) {
        self.entries.write().await.insert(user_id.to_owned(), backend.to_owned());
    }
}

/// Rejected `set_preference` input. The rendered message is user-facing and
/// lists exactly the enumerated supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported backend `{requested}`, valid set is {{{valid_set}}}")]
pub struct UnsupportedBackend {
    pub requested: String,
    pub valid_set: String,
}

impl UnsupportedBackend {
    fn new(requested: &str) -> Self {
        Self { requested: requested.to_owned(), valid_set: Backend::valid_set() }
    }
}

/// A stored preference that no longer parses into the supported set. Only
/// reachable through a durable store carrying stale values; the dispatcher
/// falls back to the default backend once.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("stored backend preference `{requested}` is not in the supported set")]
pub struct InvalidStoredPreference {
    pub requested: String,
}

/// Resolves which completion backend serves a given caller.
pub struct ProviderRouter {
    store: Arc<dyn PreferenceStore>,
    default_backend: Backend,
}

impl ProviderRouter {
    pub fn new(store: Arc<dyn PreferenceStore>, default_backend: Backend) -> Self {
        Self { store, default_backend }
    }

    pub fn default_backend(&self) -> Backend {
        self.default_backend
    }

    /// Looks up the caller's preference; absent entries resolve to the
    /// default. An empty caller identity short-circuits the lookup entirely
    /// (the dispatcher's fallback guard).
    pub async fn resolve(&self, user_id: &str) -> Result<Backend, InvalidStoredPreference> {
        if user_id.is_empty() {
            return Ok(self.default_backend);
        }

        match self.store.get(user_id).await {
            Some(raw) => raw
                .parse::<Backend>()
                .map_err(|_| InvalidStoredPreference { requested: raw }),
            None => Ok(self.default_backend),
        }
    }

    /// Validates and records a preference. On an unsupported value the
    /// stored preference is left unchanged and the error carries the
    /// user-visible message.
    pub async fn set_preference(
        &self,
        user_id: &str,
        requested: &str,
    ) -> Result<Backend, UnsupportedBackend> {
        let backend =
            requested.parse::<Backend>().map_err(|_| UnsupportedBackend::new(requested))?;
        self.store.set(user_id, backend.as_str()).await;
        Ok(backend)
    }
}
