//! # Config Service
//!
//! Resolves the process-wide configuration exactly once: fetch the partial
//! document from the configured source, merge it over the built-in defaults,
//! apply environment overrides, validate, and cache.
//!
//! Fallback policy: if the document cannot be fetched (missing, bad status,
//! network failure, malformed JSON) the service logs a warning and proceeds
//! with the built-in default tree. Validation failures of the merged tree
//! are fatal and surface to the caller at startup.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::OnceCell;

use shared::config::Configuration;

use crate::source::{env, ConfigSource};

/// Fatal configuration problems, surfaced once at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required config field: {path}")]
    MissingField { path: String },
    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

pub struct ConfigService {
    source: Arc<dyn ConfigSource>,
    use_env_overrides: bool,
    cache: OnceCell<Configuration>,
}

impl ConfigService {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            use_env_overrides: true,
            cache: OnceCell::new(),
        }
    }

    /// Skip the `THOUGHT_DROP_*` environment overlay. Used by tests that
    /// need a hermetic merge.
    pub fn without_env_overrides(mut self) -> Self {
        self.use_env_overrides = false;
        self
    }

    /// Resolve the configuration, memoized: the first call fetches and
    /// validates, every later call returns the cached tree.
    pub async fn load(&self) -> Result<&Configuration, ConfigError> {
        self.cache.get_or_try_init(|| self.resolve()).await
    }

    async fn resolve(&self) -> Result<Configuration, ConfigError> {
        let mut config = Configuration::default();

        match self.source.fetch().await {
            Ok(overlay) if overlay.is_empty() => {
                debug!("Config source {} is empty; using defaults", self.source.describe());
            }
            Ok(overlay) => {
                info!("Merging config document from {}", self.source.describe());
                config = config.merged_with(overlay);
            }
            Err(err) => {
                warn!(
                    "Failed to load config from {}: {}; using built-in defaults",
                    self.source.describe(),
                    err
                );
            }
        }

        if self.use_env_overrides {
            let overlay = env::overlay_from_env();
            if !overlay.is_empty() {
                debug!("Applying THOUGHT_DROP_* environment overrides");
                config = config.merged_with(overlay);
            }
        }

        validate(&config)?;
        info!(
            "Configuration resolved: {} names, {} emotions, {} meters",
            config.personalization.name_options.len(),
            config.personalization.emotion_emojis.len(),
            config.personalization.meters.len()
        );
        Ok(config)
    }
}

/// Check the post-merge invariants the rest of the system relies on.
pub fn validate(config: &Configuration) -> Result<(), ConfigError> {
    let personalization = &config.personalization;

    require_non_empty(&personalization.name_options, "personalization.nameOptions")?;
    require_non_empty(&personalization.emotion_emojis, "personalization.emotionEmojis")?;
    require_non_empty(&personalization.emotion_labels, "personalization.emotionLabels")?;
    require_non_empty(&personalization.event_options, "personalization.eventOptions")?;
    require_non_empty(&personalization.response_options, "personalization.responseOptions")?;

    if personalization.emotion_emojis.len() != personalization.emotion_labels.len() {
        return Err(ConfigError::Invalid {
            reason: format!(
                "emotionEmojis ({}) and emotionLabels ({}) must be the same length",
                personalization.emotion_emojis.len(),
                personalization.emotion_labels.len()
            ),
        });
    }

    if !personalization.meters.contains_key("miss_you") {
        return Err(ConfigError::MissingField {
            path: "personalization.meters.miss_you".to_string(),
        });
    }

    for (name, meter) in &personalization.meters {
        if meter.min > meter.max || meter.default_value < meter.min || meter.default_value > meter.max {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "meter '{}' bounds are inconsistent (min {}, default {}, max {})",
                    name, meter.min, meter.default_value, meter.max
                ),
            });
        }
    }

    Ok(())
}

fn require_non_empty(list: &[String], path: &str) -> Result<(), ConfigError> {
    if list.is_empty() {
        return Err(ConfigError::MissingField {
            path: path.to_string(),
        });
    }
    Ok(())
}
