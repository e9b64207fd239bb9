// Application state module
// Holds the loaded configuration and the published rule table

use super::types::Config;
use crate::rules::{RuleStore, RulesError};

/// Application state
pub struct AppState {
    pub config: Config,
    pub rules: RuleStore,
}

impl AppState {
    /// Create `AppState` with the initial rule table loaded.
    ///
    /// Fails when the rule file is missing or malformed; the server
    /// must not come up without a valid table.
    pub async fn new(config: Config) -> Result<Self, RulesError> {
        let rules = RuleStore::open(config.rules_path(), config.rules.reload).await?;
        Ok(Self { config, rules })
    }
}
