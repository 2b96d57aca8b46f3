//! Billing Domain - Commission Invoices
//!
//! Agents invoice the agency for the commission earned on each revenue
//! record. An invoice snapshots the agent's commission percentage at
//! creation; later tier or pack changes never alter it.
//!
//! # Workflow
//!
//! - **Draft**: created from a revenue record
//! - **Submitted**: sent to the agency
//! - **Approved**: accepted for payment
//! - **Paid**: commission paid out
//!
//! Every step after creation notifies the agent.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::InvoiceLifecycle;
//!
//! let invoice = lifecycle.create(&record, "Claire Dubois").await?;
//! lifecycle.submit(invoice.id).await?;
//! lifecycle.approve(invoice.id).await?;
//! let paid = lifecycle.mark_paid(invoice.id).await?;
//! assert!(paid.paid_at.is_some());
//! ```

pub mod invoice;
pub mod ports;
pub mod lifecycle;
pub mod error;

pub use invoice::{InvoiceData, InvoiceStatus};
pub use ports::InvoicePort;
pub use ports::memory::InMemoryInvoicePort;
pub use lifecycle::{InvoiceLifecycle, DEFAULT_INVOICE_PREFIX};
pub use error::BillingError;
