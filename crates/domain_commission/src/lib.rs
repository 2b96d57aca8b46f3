//! Commission Domain
//!
//! Progressive commission packs for real-estate agents. An agent subscribes
//! to a pack; the share of commission they keep grows with their cumulative
//! revenue across sales, rentals and property management.
//!
//! - [`PackCatalog`]: validated, read-only registry of packs
//! - [`CommissionCalculator`]: tier lookup, what-if simulation, progress
//! - [`RevenueLedger`]: revenue records and per-agent aggregates
//! - [`ThresholdNotifier`]: notification when an agent moves up a tier
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_commission::{CommissionCalculator, PackCatalog};
//!
//! let catalog = Arc::new(PackCatalog::from_json(&packs_json)?);
//! let calculator = CommissionCalculator::new(catalog);
//! let sim = calculator.simulate(dec!(95000), dec!(20000), current, &PackId::from("silver"))?;
//! assert_eq!(sim.estimated_commission, dec!(96600));
//! ```

pub mod pack;
pub mod catalog;
pub mod revenue;
pub mod agent_commission;
pub mod calculator;
pub mod threshold;
pub mod ports;
pub mod ledger;
pub mod error;

pub use pack::{CommissionPack, CommissionRange, MonthlyFee, TierPosition};
pub use catalog::PackCatalog;
pub use revenue::{NewRevenue, RevenueRecord, RevenueSource};
pub use agent_commission::{AgentCommission, RevenueBreakdown};
pub use calculator::{CommissionCalculator, Simulation, TierProgress};
pub use threshold::ThresholdNotifier;
pub use ports::CommissionLedgerPort;
pub use ports::memory::InMemoryCommissionLedgerPort;
pub use ledger::RevenueLedger;
pub use error::CommissionError;
