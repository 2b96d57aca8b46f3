//! Validity windows
//!
//! An agent's commission record is valid over a business date range. When an
//! agent changes pack the running record is closed and a new one is opened;
//! records are superseded, never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Period is already closed at {0}")]
    AlreadyClosed(String),
}

/// A business validity window
///
/// `start_date` is inclusive, `end_date` is exclusive; `None` means the
/// window is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPeriod {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl ValidPeriod {
    /// Creates an open-ended period starting on the given date
    pub fn from(start_date: NaiveDate) -> Self {
        Self { start_date, end_date: None }
    }

    /// Returns true if the period has no end date
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Closes the period on the given date
    ///
    /// A window opened and closed on the same day collapses to a single day,
    /// so the end is pushed to the day after the start.
    pub fn close_on(&mut self, date: NaiveDate) -> Result<(), TemporalError> {
        if let Some(end) = self.end_date {
            return Err(TemporalError::AlreadyClosed(end.to_string()));
        }
        if date < self.start_date {
            return Err(TemporalError::InvalidPeriod {
                start: self.start_date.to_string(),
                end: date.to_string(),
            });
        }
        let end = if date == self.start_date {
            date.succ_opt().unwrap_or(date)
        } else {
            date
        };
        self.end_date = Some(end);
        Ok(())
    }
}
