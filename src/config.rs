//! Comparer configuration, loadable from YAML.
//!
//! ```yaml
//! version: v1
//! compatibility:
//!   stub_unresolved_imports: false
//!   import_roots:
//!     - protos
//!     - third_party/protos
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for building descriptor trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparerConfig {
    /// Replace imports nobody can supply with an empty `proto3` file.
    #[serde(default = "default_true")]
    pub stub_unresolved_imports: bool,
    /// Directories searched for imports when no file system is injected.
    #[serde(default)]
    pub import_roots: Vec<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for ComparerConfig {
    fn default() -> Self {
        Self {
            stub_unresolved_imports: true,
            import_roots: Vec::new(),
        }
    }
}

impl ComparerConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct ConfigFile {
            compatibility: Option<ComparerConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        Ok(config_file.compatibility.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComparerConfig::default();
        assert!(config.stub_unresolved_imports);
        assert!(config.import_roots.is_empty());
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = ComparerConfig::from_yaml_str("version: v1\n").unwrap();
        assert_eq!(config, ComparerConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ComparerConfig::from_yaml_str("compatibility: [unclosed").is_err());
    }
}
