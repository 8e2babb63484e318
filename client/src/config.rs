//! The persisted provisioning configuration.
//!
//! A small versioned JSON document recording what a provisioning run has
//! already accomplished against an endpoint. Saves are atomic (temp file,
//! then rename), so a crashed run never leaves a half-written config; the
//! absence of the file is the `Unconfigured` state.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::secret::PayerSecret;

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config at {0}")]
    NotFound(PathBuf),
    #[error("config is corrupt: {0}")]
    Corrupt(String),
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("config i/o failed")]
    Io(#[from] std::io::Error),
}

/// How far a provisioning run has gotten. Transitions only move forward.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derive(strum_macros::Display)]
pub enum Stage {
    ProgramDeployed,
    AccountsCreated,
    Ready,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProvisioningConfig {
    pub version: u32,
    pub stage: Stage,
    pub url: String,
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keeper_pubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_pubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_secret: Option<PayerSecret>,
}

impl ProvisioningConfig {
    pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
        parse_pubkey(&self.program_id)
    }

    pub fn keeper_pubkey(&self) -> Result<Option<Pubkey>, ConfigError> {
        self.keeper_pubkey.as_deref().map(parse_pubkey).transpose()
    }

    pub fn validator_pubkey(&self) -> Result<Option<Pubkey>, ConfigError> {
        self.validator_pubkey
            .as_deref()
            .map(parse_pubkey)
            .transpose()
    }
}

fn parse_pubkey(encoded: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(encoded)
        .map_err(|_| ConfigError::Corrupt(format!("invalid public key `{encoded}`")))
}

/// Sole reader and writer of the config file. Single-writer per endpoint is
/// assumed; there is no inter-process locking.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the config. A missing file is [`ConfigError::NotFound`];
    /// anything unreadable or unparseable is [`ConfigError::Corrupt`] and is never
    /// guess-repaired.
    pub fn load(&self) -> Result<ProvisioningConfig, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        let config: ProvisioningConfig =
            serde_json::from_str(&raw).map_err(|err| ConfigError::Corrupt(err.to_string()))?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Writes the full config atomically: the temp file is fully written and
    /// flushed before it replaces the previous one.
    pub fn save(&self, config: &ProvisioningConfig) -> Result<(), ConfigError> {
        let serialized = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Corrupt(err.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pricedb-config-{}-{name}.json", std::process::id()))
    }

    fn sample(url: &str) -> ProvisioningConfig {
        ProvisioningConfig {
            version: CONFIG_VERSION,
            stage: Stage::Ready,
            url: url.to_string(),
            program_id: Pubkey::new_unique().to_string(),
            keeper_pubkey: Some(Pubkey::new_unique().to_string()),
            validator_pubkey: None,
            payer_secret: None,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = scratch_path("round-trip");
        let store = ConfigStore::new(&path);
        let config = sample("http://localhost:8899");
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
        assert!(!path.with_extension("tmp").exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let store = ConfigStore::new(scratch_path("missing"));
        assert!(matches!(store.load().unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_unknown_fields_are_corrupt() {
        let path = scratch_path("unknown-fields");
        let mut value = serde_json::to_value(sample("http://localhost:8899")).unwrap();
        value["surprise"] = serde_json::json!(1);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        assert!(matches!(
            ConfigStore::new(&path).load().unwrap_err(),
            ConfigError::Corrupt(_)
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_garbage_is_corrupt_not_repaired() {
        let path = scratch_path("garbage");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ConfigStore::new(&path).load().unwrap_err(),
            ConfigError::Corrupt(_)
        ));
        // The corrupt file must survive untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let path = scratch_path("version");
        let mut config = sample("http://localhost:8899");
        config.version = 99;
        let store = ConfigStore::new(&path);
        store.save(&config).unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            ConfigError::UnsupportedVersion(99)
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::ProgramDeployed < Stage::AccountsCreated);
        assert!(Stage::AccountsCreated < Stage::Ready);
    }
}
