//! ReaderApi state shared by every request.
//!
//! Holds the configuration and the two collaborators (entry store and user
//! directory). Nothing in here is mutated after startup; per-request state
//! lives in [`crate::auth::Session`] and the HTTP layer's request value.

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::storage::ReaderStore;
use crate::users::UserDirectory;
use greader_core::TokenService;
use std::sync::Arc;

/// Main API server state.
pub struct ReaderApi {
    config: Config,
    store: Arc<dyn ReaderStore>,
    users: Arc<dyn UserDirectory>,
    /// Present iff the system salt is configured.
    tokens: Option<TokenService>,
}

impl std::fmt::Debug for ReaderApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderApi")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl ReaderApi {
    /// Create the API state from its configuration and collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn ReaderStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        let tokens = config.api.salt.as_deref().map(TokenService::new);
        if tokens.is_none() {
            tracing::warn!("No [api] salt configured: authenticated routes will answer 500");
        }
        Self {
            config,
            store,
            users,
            tokens,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the entry store.
    pub fn store(&self) -> &dyn ReaderStore {
        self.store.as_ref()
    }

    /// Get the user directory.
    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    /// Get the token service.
    ///
    /// # Errors
    ///
    /// [`ApiError::InternalServerError`] when no salt is configured.
    pub fn tokens(&self) -> ApiResult<&TokenService> {
        self.tokens
            .as_ref()
            .ok_or_else(|| ApiError::InternalServerError("system salt is not configured".into()))
    }

    /// Favicon URL of a feed: `<base_url>/f.php?<crc32(salt ‖ url)>`.
    ///
    /// `feed_url` is the stored (escaped) URL.
    pub fn icon_url(&self, feed_url: &str) -> ApiResult<String> {
        let salt = self
            .config
            .api
            .salt
            .as_deref()
            .ok_or_else(|| ApiError::InternalServerError("system salt is not configured".into()))?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(salt.as_bytes());
        hasher.update(feed_url.as_bytes());

        Ok(format!(
            "{}/f.php?{:08x}",
            self.config.server.base_url.trim_end_matches('/'),
            hasher.finalize()
        ))
    }
}
