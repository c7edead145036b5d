//! Clinic configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::budget::DEFAULT_VALIDITY_DAYS;

pub const DEFAULT_CLINIC_NAME: &str = "Clínica Odontológica";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Professional who signs budgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Professional {
    pub name: String,
    /// Council registration, e.g. "CRO-SP 12345"
    pub registry: String,
}

/// Settings shared by every clinic screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicConfig {
    /// SQLite file; `None` means in-memory.
    pub database_path: Option<PathBuf>,
    /// Shown in document headers.
    pub clinic_name: String,
    pub professional: Professional,
    /// Days a new budget stays valid.
    pub budget_validity_days: u32,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            clinic_name: DEFAULT_CLINIC_NAME.to_string(),
            professional: Professional::default(),
            budget_validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

impl ClinicConfig {
    /// Load configuration from the environment (and a `.env` file if present).
    ///
    /// | Env Var                        | Default                |
    /// |--------------------------------|------------------------|
    /// | `ODONTO_DATABASE_PATH`         | in-memory              |
    /// | `ODONTO_CLINIC_NAME`           | `Clínica Odontológica` |
    /// | `ODONTO_PROFESSIONAL_NAME`     | empty                  |
    /// | `ODONTO_PROFESSIONAL_REGISTRY` | empty                  |
    /// | `ODONTO_BUDGET_VALIDITY_DAYS`  | `30`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let budget_validity_days = match get("ODONTO_BUDGET_VALIDITY_DAYS") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                var: "ODONTO_BUDGET_VALIDITY_DAYS",
                expected: "number of days",
                value: value.clone(),
            })?,
            None => defaults.budget_validity_days,
        };

        Ok(Self {
            database_path: get("ODONTO_DATABASE_PATH").map(PathBuf::from),
            clinic_name: get("ODONTO_CLINIC_NAME").unwrap_or(defaults.clinic_name),
            professional: Professional {
                name: get("ODONTO_PROFESSIONAL_NAME").unwrap_or_default(),
                registry: get("ODONTO_PROFESSIONAL_REGISTRY").unwrap_or_default(),
            },
            budget_validity_days,
        })
    }
}
