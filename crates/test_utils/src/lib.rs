//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! commission engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Reference packs, dates and identifiers
//! - `builders`: Builder patterns for revenue events and packs
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
