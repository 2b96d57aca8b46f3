//! Engine configuration

use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use core_kernel::PackId;
use domain_billing::DEFAULT_INVOICE_PREFIX;
use domain_commission::{CommissionError, PackCatalog};
use crate::error::EngineError;

/// Engine configuration
///
/// Read from `COMMISSION_*` environment variables, e.g.
/// `COMMISSION_PACKS_PATH=/etc/agence/packs.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// JSON file holding the commission packs
    pub packs_path: Option<PathBuf>,
    /// Pack given to agents first seen through a revenue event
    pub default_pack_id: Option<String>,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Prefix of invoice numbers
    pub invoice_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            packs_path: None,
            default_pack_id: None,
            log_level: "info".to_string(),
            log_json: false,
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("COMMISSION"))
            .build()?
            .try_deserialize()
    }

    /// Loads `.env` if present, then the environment
    pub fn load() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();
        Ok(Self::from_env()?)
    }

    pub fn default_pack(&self) -> Option<PackId> {
        self.default_pack_id.as_deref().map(PackId::from)
    }

    /// Reads and validates the pack file
    pub fn load_catalog(&self) -> Result<PackCatalog, EngineError> {
        let path = self
            .packs_path
            .as_ref()
            .ok_or_else(|| CommissionError::configuration("COMMISSION_PACKS_PATH is not set"))?;

        let json = std::fs::read_to_string(path).map_err(|source| EngineError::PackFile {
            path: path.clone(),
            source,
        })?;
        let catalog = PackCatalog::from_json(&json)?;

        info!(path = %path.display(), packs = catalog.len(), "Commission packs loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.invoice_prefix, "FAC");
        assert_eq!(config.log_level, "info");
        assert!(config.default_pack().is_none());
    }

    #[test]
    fn test_missing_packs_path() {
        let err = EngineConfig::default().load_catalog().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unreadable_packs_file() {
        let config = EngineConfig {
            packs_path: Some(PathBuf::from("/nonexistent/packs.json")),
            ..EngineConfig::default()
        };
        assert!(matches!(config.load_catalog(), Err(EngineError::PackFile { .. })));
    }
}
