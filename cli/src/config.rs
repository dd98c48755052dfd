//! CLI configuration file.
//!
//! Every section is optional. Relative paths are resolved against the
//! directory holding the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use symtriage_contracts::error::{TriageError, TriageResult};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "symtriage.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriageConfig {
    pub rules: RulesSection,
    pub logging: LoggingSection,
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesSection {
    /// Custom rule table; the built-in table is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsSection {
    pub enabled: bool,
    pub stream_id: String,
    /// JSON-lines log file. Evaluations are not recorded when unset.
    pub path: Option<PathBuf>,
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            stream_id: "cli".to_string(),
            path: None,
        }
    }
}

impl TriageConfig {
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        toml::from_str(s).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `symtriage.toml` in the
    /// working directory is read if present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>) -> TriageResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to read config '{}': {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [self.rules.path.as_mut(), self.analytics.path.as_mut()]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
