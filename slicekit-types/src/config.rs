//! Index and slice configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Field that holds the index-assigned key when none is configured.
pub const DEFAULT_GUID_KEY: &str = "gid";

/// Field that holds a caller-owned identifier when none is configured.
pub const DEFAULT_ID_KEY: &str = "id";

/// Configuration shared by an index and, unless overridden, its slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the field holding the index-assigned key.
    pub guid_key: String,
    /// Name of the field holding the caller's own identifier, if any.
    pub id_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guid_key: DEFAULT_GUID_KEY.to_string(),
            id_key: DEFAULT_ID_KEY.to_string(),
        }
    }
}

impl Config {
    /// Default configuration with a different key field.
    pub fn with_guid_key(guid_key: impl Into<String>) -> Self {
        Self {
            guid_key: guid_key.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that could not locate a key.
    pub fn validate(&self) -> Result<()> {
        if self.guid_key.trim().is_empty() {
            return Err(Error::InvalidConfig("guid_key must not be empty".into()));
        }
        if self.id_key.trim().is_empty() {
            return Err(Error::InvalidConfig("id_key must not be empty".into()));
        }
        if self.guid_key == self.id_key {
            return Err(Error::InvalidConfig(format!(
                "guid_key and id_key must differ (both are {:?})",
                self.guid_key
            )));
        }
        Ok(())
    }
}
