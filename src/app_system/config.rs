use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::Address;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("buffer_size must be positive")]
    ZeroBuffer,
    #[error("registry and ledger must have distinct addresses")]
    AddressClash,
}

/// Deployment settings for the registry and the ledger.
///
/// Missing fields fall back to the defaults, which match the first accounts
/// and deployment addresses of a local development chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Request queue capacity of each actor, also the event fan-out buffer.
    pub buffer_size: usize,
    /// Receives admin and manager roles on both components.
    pub deployer: Address,
    pub registry_address: Address,
    pub ledger_address: Address,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            deployer: Address::new([
                0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72,
                0x79, 0xcf, 0xff, 0xb9, 0x22, 0x66,
            ]),
            registry_address: Address::new([
                0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f,
                0x64, 0x2f, 0x64, 0x18, 0x0a, 0xa3,
            ]),
            ledger_address: Address::new([
                0xe7, 0xf1, 0x72, 0x5e, 0x77, 0x34, 0xce, 0x28, 0x8f, 0x83, 0xe7, 0xe1, 0x2b, 0x8a,
                0x9e, 0x6c, 0x1a, 0x08, 0xa2, 0xe9,
            ]),
        }
    }
}

impl SystemConfig {
    /// Names a JSON config file; defaults apply when unset.
    pub const ENV_VAR: &'static str = "SCORE_LEDGER_CONFIG";

    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "Loaded system config");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBuffer);
        }
        if self.registry_address == self.ledger_address {
            return Err(ConfigError::AddressClash);
        }
        Ok(())
    }
}
