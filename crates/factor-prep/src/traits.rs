//! Core trait definitions for panel tables.
//!
//! Every pipeline stage operates on a type implementing [`PanelFrame`], so the
//! same filter, split and reshape code serves both raw and labeled panels.

use crate::{PrepError, Result, schema::DATE};
use chrono::NaiveDate;
use polars::prelude::*;

/// A table of (entity, date) observations backed by a polars [`DataFrame`].
///
/// Stages never mutate their input. They read through [`PanelFrame::frame`]
/// and build a fresh value with `From<DataFrame>`.
pub trait PanelFrame: From<DataFrame> + std::fmt::Debug {
    /// The underlying frame.
    fn frame(&self) -> &DataFrame;

    /// Number of observations.
    fn height(&self) -> usize {
        self.frame().height()
    }

    /// Whether the panel has no observations.
    fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// A lazy view over a copy of the frame.
    fn lazy(&self) -> LazyFrame {
        self.frame().clone().lazy()
    }

    /// Fails with [`PrepError::MissingColumn`] on the first absent column.
    fn require_columns(&self, columns: &[&str]) -> Result<()> {
        let frame = self.frame();
        match columns
            .iter()
            .find(|name| frame.get_column_index(name).is_none())
        {
            Some(missing) => Err(PrepError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Distinct observation dates in ascending order.
    fn dates(&self) -> Result<Vec<NaiveDate>> {
        self.require_columns(&[DATE])?;
        let unique = self
            .lazy()
            .select([col(DATE).unique().sort(Default::default())])
            .collect()?;

        Ok(unique
            .column(DATE)?
            .date()?
            .as_date_iter()
            .flatten()
            .collect())
    }
}
