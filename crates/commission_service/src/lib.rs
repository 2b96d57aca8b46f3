//! Commission Service
//!
//! Entry point of the commission engine for the agency intranet. Loads the
//! configuration and the pack file, installs tracing, and wires the domain
//! services behind [`CommissionEngine`].
//!
//! # Environment Variables
//!
//! * `COMMISSION_PACKS_PATH` - JSON file of commission packs
//! * `COMMISSION_DEFAULT_PACK_ID` - Pack for agents first seen through a revenue
//! * `COMMISSION_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `COMMISSION_LOG_JSON` - Emit JSON log lines (default: false)
//! * `COMMISSION_INVOICE_PREFIX` - Invoice number prefix (default: FAC)
//!
//! # Example
//!
//! ```rust,ignore
//! use commission_service::{config::EngineConfig, telemetry, CommissionEngine};
//!
//! let config = EngineConfig::load()?;
//! telemetry::init_tracing(&config.log_level, config.log_json)?;
//! let engine = CommissionEngine::from_config(&config)?;
//! let progress = engine.progress_for_agent(agent_id).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::EngineConfig;
pub use engine::{CommissionEngine, EnginePorts};
pub use error::EngineError;
