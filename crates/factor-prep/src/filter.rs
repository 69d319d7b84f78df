//! Calendar window filtering.

use crate::{
    PrepError, Result,
    schema::{DATE, ymd},
    traits::PanelFrame,
};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default exclusive lower bound of the study window.
pub const DEFAULT_AFTER: NaiveDate = ymd(1999, 12, 31);

/// Default exclusive upper bound of the study window.
pub const DEFAULT_BEFORE: NaiveDate = ymd(2019, 1, 1);

/// Open calendar interval `(after, before)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// Exclusive lower bound
    pub after: NaiveDate,
    /// Exclusive upper bound
    pub before: NaiveDate,
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            after: DEFAULT_AFTER,
            before: DEFAULT_BEFORE,
        }
    }
}

impl DateWindow {
    /// Create a validated window.
    pub fn new(after: NaiveDate, before: NaiveDate) -> Result<Self> {
        let window = Self { after, before };
        window.validate()?;
        Ok(window)
    }

    /// Fails unless `after < before`.
    pub fn validate(&self) -> Result<()> {
        if self.after >= self.before {
            return Err(PrepError::InvalidDateRange {
                start: self.after.to_string(),
                end: self.before.to_string(),
            });
        }
        Ok(())
    }

    /// Whether `date` lies strictly inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.after < date && date < self.before
    }

    fn predicate(&self) -> Expr {
        col(DATE)
            .gt(lit(self.after))
            .and(col(DATE).lt(lit(self.before)))
    }
}

/// Keep the rows whose date lies strictly inside `window`.
///
/// Rows without a date are dropped.
pub fn filter_dates<P: PanelFrame>(panel: &P, window: &DateWindow) -> Result<P> {
    window.validate()?;
    panel.require_columns(&[DATE])?;

    let filtered = panel.lazy().filter(window.predicate()).collect()?;
    info!(
        after = %window.after,
        before = %window.before,
        kept = filtered.height(),
        dropped = panel.height() - filtered.height(),
        "filtered panel to date window"
    );

    Ok(P::from(filtered))
}
