//! Per-invocation state: configuration plus a freshly seeded repository.

use std::path::Path;
use std::sync::Arc;

use cv_core::Timestamp;
use cv_store::InMemoryRepository;

use crate::config::{load_policies, CliConfig, ConfigError};

/// Everything a subcommand handler needs.
#[derive(Debug)]
pub struct AppContext {
    pub config: CliConfig,
    pub repository: Arc<InMemoryRepository>,
}

impl AppContext {
    /// Seed the demo data relative to now and apply an optional policy file.
    pub fn load(config: CliConfig, policies: Option<&Path>) -> Result<Self, ConfigError> {
        let repository = InMemoryRepository::seeded(Timestamp::now());
        if let Some(path) = policies {
            let loaded = load_policies(path)?;
            tracing::info!(path = %path.display(), count = loaded.len(), "loaded policies");
            repository.replace_policies(loaded);
        }
        Ok(Self {
            config,
            repository: Arc::new(repository),
        })
    }

    /// Seeded context with default configuration.
    pub fn seeded() -> Self {
        Self {
            config: CliConfig::default(),
            repository: Arc::new(InMemoryRepository::seeded(Timestamp::now())),
        }
    }
}
