//! Core Kernel - Foundational types for the commission engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for agents, users, revenues, invoices and notifications
//! - Commission percentages with precise decimal arithmetic
//! - Validity windows for agent commission records
//! - The error taxonomy and the persistence port error type

pub mod identifiers;
pub mod percentage;
pub mod temporal;
pub mod ports;
pub mod error;

pub use identifiers::{AgentId, UserId, RevenueId, InvoiceId, NotificationId, PackId};
pub use percentage::{Percentage, PercentageError};
pub use temporal::{ValidPeriod, TemporalError};
pub use ports::{PortError, DomainPort};
pub use error::{CoreError, ErrorKind};
