//! Environment-driven settings
//!
//! maskcalc has no configuration files. The few knobs it has are read from
//! environment variables and overridden by command-line flags.

use std::env;
use thiserror::Error;

use crate::FamilyMode;

/// Environment variable selecting the default family mode
pub const FAMILY_VAR: &str = "MASKCALC_FAMILY";

/// Environment variable holding the log filter directive
pub const LOG_VAR: &str = "MASKCALC_LOG";

/// Settings errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable set to a value that cannot be interpreted
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings resolved from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Family mode used when no `-4`/`-6` flag is given
    pub family: FamilyMode,
    /// Log filter directive, if set
    pub log_filter: Option<String>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let family = match lookup(FAMILY_VAR) {
            Some(value) => value
                .parse::<FamilyMode>()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: FAMILY_VAR,
                    value,
                    reason,
                })?,
            None => FamilyMode::default(),
        };

        let log_filter = lookup(LOG_VAR).filter(|v| !v.trim().is_empty());

        Ok(Self { family, log_filter })
    }

    /// Family mode after applying command-line overrides
    pub fn family_with(&self, force_v4: bool, force_v6: bool) -> FamilyMode {
        if force_v6 {
            FamilyMode::V6
        } else if force_v4 {
            FamilyMode::V4
        } else {
            self.family
        }
    }
}
