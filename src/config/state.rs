// Application state module
// Immutable data shared by every connection

use super::types::Config;
use crate::content::ContentStore;
use crate::error::ServerError;
use crate::http::CorsPolicy;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub content: ContentStore,
    pub cors: CorsPolicy,
}

impl AppState {
    /// Create `AppState` with the published content tables
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        Self::with_content(config, ContentStore::seeded())
    }

    /// Create `AppState` serving the given content
    pub fn with_content(config: &Config, content: ContentStore) -> Result<Self, ServerError> {
        let cors = CorsPolicy::from_config(&config.cors)?;

        Ok(Self {
            config: config.clone(),
            content,
            cors,
        })
    }
}
