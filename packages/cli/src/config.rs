use folio_intake::AcceptanceConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory uploaded assets are copied into
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// URL prefix for stored assets; `file://` URLs when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,

    /// Limits applied to every attached asset
    #[serde(default)]
    pub acceptance: AcceptanceConfig,
}

fn default_store_dir() -> String {
    "uploads".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the asset store
    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            public_base_url: None,
            acceptance: AcceptanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "assets",
            "publicBaseUrl": "https://cdn.example.com/assets",
            "acceptance": {
                "acceptedTypePatterns": ["image/*"],
                "maxBytes": 5000000,
                "maxFiles": 1
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "assets");
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://cdn.example.com/assets")
        );
        assert_eq!(config.acceptance.accepted_type_patterns, vec!["image/*"]);
        assert_eq!(config.acceptance.max_bytes, Some(5_000_000));
        assert_eq!(config.acceptance.max_files, Some(1));
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store_dir, "uploads");
        assert!(config.acceptance.accepted_type_patterns.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }
}
