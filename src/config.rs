//! Ledger configuration: JSON file plus `PARKING_*` environment overrides.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    auth::{Credential, CredentialTable},
    core::ledger::ParkingLedger,
    persist::{
        EventStore, StorageResult, csv_log::CsvEventLog, sqlite::SqliteEventJournal,
    },
    types::Role,
};

/// Default number of slots.
pub const DEFAULT_CAPACITY: u32 = 20;
/// Default event log location.
pub const DEFAULT_LOG_PATH: &str = "vehicle_log.csv";

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Config file is not valid JSON for [`LedgerConfig`].
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    /// Environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
    /// Capacity must allow at least one slot.
    #[error("capacity must be at least 1")]
    ZeroCapacity,
}

/// Event store implementation selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Line-oriented CSV text file.
    #[default]
    Csv,
    /// SQLite database file.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(()),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Sqlite => "sqlite",
        })
    }
}

/// Everything the binary needs to build a ledger and its role gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Number of slots, numbered `1..=capacity`.
    pub capacity: u32,
    /// Event log location.
    pub log_path: PathBuf,
    /// Storage backend for `log_path`.
    pub backend: StorageBackend,
    /// Accepted logins.
    pub credentials: Vec<Credential>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            backend: StorageBackend::Csv,
            credentials: Vec::new(),
        }
    }
}

impl LedgerConfig {
    /// Parses a JSON document; absent keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Loads `file` (or defaults), applies process environment overrides and
    /// validates the result.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `PARKING_*` overrides looked up through `lookup`.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("PARKING_CAPACITY") {
            self.capacity = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PARKING_CAPACITY".to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("PARKING_LOG_PATH") {
            self.log_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("PARKING_BACKEND") {
            self.backend = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PARKING_BACKEND".to_string(),
                value: value.clone(),
            })?;
        }

        for (role, user_key, password_key) in [
            (Role::Attendant, "PARKING_ATTENDANT_USER", "PARKING_ATTENDANT_PASSWORD"),
            (Role::Supervisor, "PARKING_SUPERVISOR_USER", "PARKING_SUPERVISOR_PASSWORD"),
        ] {
            self.override_credential(role, lookup(user_key), lookup(password_key));
        }
        Ok(self)
    }

    /// Rejects configurations the ledger cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Opens the configured event store, initializing it if missing.
    pub fn open_store(&self) -> StorageResult<Box<dyn EventStore>> {
        Ok(match self.backend {
            StorageBackend::Csv => Box::new(CsvEventLog::open(&self.log_path)?),
            StorageBackend::Sqlite => Box::new(SqliteEventJournal::open(&self.log_path)?),
        })
    }

    /// Ledger over the configured store and capacity.
    pub fn open_ledger(&self) -> StorageResult<ParkingLedger> {
        Ok(ParkingLedger::new(self.open_store()?, self.capacity))
    }

    /// Role gate built from `credentials`.
    pub fn authenticator(&self) -> CredentialTable {
        CredentialTable::new(self.credentials.clone())
    }

    fn override_credential(&mut self, role: Role, username: Option<String>, password: Option<String>) {
        if username.is_none() && password.is_none() {
            return;
        }
        match self.credentials.iter_mut().find(|c| c.role == role) {
            Some(existing) => {
                if let Some(username) = username {
                    existing.username = username;
                }
                if let Some(password) = password {
                    existing.password = password;
                }
            }
            None => {
                // A username alone unlocks nothing.
                let Some(password) = password else {
                    return;
                };
                self.credentials.push(Credential {
                    role,
                    username: username.unwrap_or_else(|| role.as_str().to_string()),
                    password,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::auth::Authenticator;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn json_missing_keys_fall_back_to_defaults() {
        let config = LedgerConfig::from_json_str(r#"{ "capacity": 5 }"#).expect("parse");
        assert_eq!(config.capacity, 5);
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
        assert_eq!(config.backend, StorageBackend::Csv);
        assert!(config.credentials.is_empty());
    }

    #[test]
    fn json_credentials_and_backend() {
        let config = LedgerConfig::from_json_str(
            r#"{
                "backend": "sqlite",
                "log_path": "lot.db",
                "credentials": [
                    { "role": "supervisor", "username": "boss", "password": "pw" }
                ]
            }"#,
        )
        .expect("parse");
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert!(config.authenticator().authenticate(Role::Supervisor, "BOSS", "pw"));
    }

    #[test]
    fn env_overrides_replace_and_add() {
        let config = LedgerConfig::default()
            .apply_overrides(lookup(&[
                ("PARKING_CAPACITY", " 3 "),
                ("PARKING_BACKEND", "SQLite"),
                ("PARKING_ATTENDANT_PASSWORD", "gate"),
                ("PARKING_SUPERVISOR_USER", "nobody"),
            ]))
            .expect("overrides");
        assert_eq!(config.capacity, 3);
        assert_eq!(config.backend, StorageBackend::Sqlite);

        let auth = config.authenticator();
        assert!(auth.authenticate(Role::Attendant, "attendant", "gate"));
        assert!(!auth.has_role(Role::Supervisor));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = LedgerConfig::default()
            .apply_overrides(lookup(&[("PARKING_CAPACITY", "many")]))
            .expect_err("bad capacity");
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PARKING_CAPACITY"));

        let zero = LedgerConfig {
            capacity: 0,
            ..LedgerConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroCapacity)));
    }
}
