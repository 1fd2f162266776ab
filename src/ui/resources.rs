use crate::errors;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StringKey {
    Initializing,
    DirectMode,
    GlobalMode,
    RuleMode,
    FormatFetchingConfiguration,
    FormatFetchingProvider,
    Verifying,
}

/// Label table for the main screen. Format entries take one `{}` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub initializing: String,
    pub direct_mode: String,
    pub global_mode: String,
    pub rule_mode: String,
    pub format_fetching_configuration: String,
    pub format_fetching_provider: String,
    pub verifying: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            initializing: "Initializing".to_string(),
            direct_mode: "Direct Mode".to_string(),
            global_mode: "Global Mode".to_string(),
            rule_mode: "Rule Mode".to_string(),
            format_fetching_configuration: "Fetching configuration: {}".to_string(),
            format_fetching_provider: "Fetching provider: {}".to_string(),
            verifying: "Verifying".to_string(),
        }
    }
}

impl Strings {
    pub fn get(&self, key: StringKey) -> &str {
        match key {
            StringKey::Initializing => &self.initializing,
            StringKey::DirectMode => &self.direct_mode,
            StringKey::GlobalMode => &self.global_mode,
            StringKey::RuleMode => &self.rule_mode,
            StringKey::FormatFetchingConfiguration => &self.format_fetching_configuration,
            StringKey::FormatFetchingProvider => &self.format_fetching_provider,
            StringKey::Verifying => &self.verifying,
        }
    }
}

/// Shared, hot-swappable handle to the active label table.
#[derive(Debug, Clone)]
pub struct Resources {
    strings: Arc<ArcSwap<Strings>>,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(Strings::default())
    }
}

impl Resources {
    pub fn new(strings: Strings) -> Self {
        Self {
            strings: Arc::new(ArcSwap::from_pointee(strings)),
        }
    }

    pub async fn load(path: &Path) -> Self {
        let resources = Self::default();
        if let Err(e) = resources.reload(path).await {
            tracing::warn!("Using built-in strings: {:#}", e);
        }
        resources
    }

    /// Replaces the table from a YAML file. On error the current table stays active.
    pub async fn reload(&self, path: &Path) -> anyhow::Result<()> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            anyhow::Error::new(e).context(errors::strings::failed_to_read(
                &path.display().to_string(),
            ))
        })?;

        let strings = serde_yaml::from_str::<Strings>(&contents).map_err(|e| {
            tracing::error!("Corrupted string resources at {}: {}", path.display(), e);
            anyhow::anyhow!(errors::strings::corrupted_yaml(
                &path.display().to_string(),
                &e.to_string()
            ))
        })?;

        self.strings.store(Arc::new(strings));

        tracing::info!("Loaded string resources from {}", path.display());

        Ok(())
    }

    pub fn get(&self, key: StringKey) -> String {
        self.strings.load().get(key).to_string()
    }

    pub fn format(&self, key: StringKey, arg: &str) -> String {
        self.strings.load().get(key).replacen("{}", arg, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_keys_are_snake_case_resource_names() {
        assert_eq!(StringKey::DirectMode.as_ref(), "direct_mode");
        assert_eq!(StringKey::GlobalMode.as_ref(), "global_mode");
        assert_eq!(StringKey::RuleMode.as_ref(), "rule_mode");
        assert_eq!(
            StringKey::FormatFetchingProvider.as_ref(),
            "format_fetching_provider"
        );
    }

    #[test]
    fn test_every_key_has_a_default() {
        let strings = Strings::default();
        for key in StringKey::iter() {
            assert!(!strings.get(key).is_empty(), "{} is empty", key.as_ref());
        }
    }

    #[test]
    fn test_format_substitutes_argument() {
        let resources = Resources::default();
        assert_eq!(
            resources.format(StringKey::FormatFetchingProvider, "geoip"),
            "Fetching provider: geoip"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let strings: Strings = serde_yaml::from_str("rule_mode: Regelmodus\n").unwrap();
        assert_eq!(strings.rule_mode, "Regelmodus");
        assert_eq!(strings.direct_mode, "Direct Mode");
    }
}
