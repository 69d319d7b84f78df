//! Complete-entity selection and the date x entity returns matrix.
//!
//! An entity is "complete" when its observation count equals the maximum
//! count over all entities. The threshold adapts to the densest entity of the
//! panel rather than to a fixed calendar length, so several entities may tie.

use crate::{
    PrepError, Result,
    schema::{COUNT, DATE, R1M, STOCK_ID},
    traits::PanelFrame,
};
use chrono::NaiveDate;
use derive_more::{Display, Into};
use ndarray::Array2;
use polars::prelude::pivot::pivot_stable;
use polars::prelude::*;
use tracing::{debug, info};

/// Number of observations per entity, sorted by `stock_id`.
///
/// Rows without a `stock_id` belong to no entity and are not counted.
pub fn observation_counts<P: PanelFrame>(panel: &P) -> Result<DataFrame> {
    panel.require_columns(&[STOCK_ID, DATE])?;

    let counts = panel
        .lazy()
        .filter(col(STOCK_ID).is_not_null())
        .group_by([col(STOCK_ID)])
        .agg([col(DATE).count().alias(COUNT)])
        .sort([STOCK_ID], Default::default())
        .collect()?;

    Ok(counts)
}

/// Entities whose observation count equals the maximum, sorted.
pub fn complete_entities<P: PanelFrame>(panel: &P) -> Result<Series> {
    let complete = observation_counts(panel)?
        .lazy()
        .filter(col(COUNT).eq(col(COUNT).max()))
        .select([col(STOCK_ID)])
        .collect()?;

    Ok(complete.column(STOCK_ID)?.as_materialized_series().clone())
}

/// Build the `R1M_Usd` returns matrix of the complete entities.
///
/// One row per date (ascending) and one Float64 column per complete entity,
/// named by its id as text. Columns follow the order of the original
/// `stock_id` values, so numeric ids stay in numeric order. A date on which
/// an entity has no observation is null.
///
/// # Errors
///
/// [`PrepError::DuplicateKey`] if an entity has more than one row on a date,
/// in which case the matrix cell would be ambiguous.
pub fn build_returns_matrix<P: PanelFrame>(panel: &P) -> Result<ReturnsMatrix> {
    panel.require_columns(&[STOCK_ID, DATE, R1M])?;

    let complete = complete_entities(panel)?;
    debug!(entities = complete.len(), "selected complete entities");

    let mut order = vec![DATE.to_string()];
    order.extend(
        complete
            .cast(&DataType::String)?
            .str()?
            .into_no_null_iter()
            .map(str::to_string),
    );

    let long = panel
        .lazy()
        .filter(col(STOCK_ID).is_in(lit(complete)))
        .select([
            col(DATE),
            col(STOCK_ID).cast(DataType::String),
            col(R1M).cast(DataType::Float64),
        ])
        .collect()?;
    ensure_unique_keys(&long)?;

    if long.height() == 0 {
        let empty = DataFrame::new(vec![Column::new_empty(DATE.into(), &DataType::Date)])?;
        return Ok(ReturnsMatrix(empty));
    }

    // Keys are unique, so no aggregation is needed.
    let wide = pivot_stable(
        &long,
        [STOCK_ID],
        Some([DATE]),
        Some([R1M]),
        false,
        None,
        None,
    )?
    .select(order)?
    .sort([DATE], Default::default())?;

    let matrix = ReturnsMatrix(wide);
    let (dates, entities) = matrix.shape();
    info!(dates, entities, "built returns matrix");

    Ok(matrix)
}

fn ensure_unique_keys(long: &DataFrame) -> Result<()> {
    let duplicates = long
        .clone()
        .lazy()
        .group_by([col(DATE), col(STOCK_ID)])
        .agg([len().alias(COUNT)])
        .filter(col(COUNT).gt(lit(1)))
        .sort([DATE, STOCK_ID], Default::default())
        .limit(1)
        .collect()?;

    if duplicates.height() == 0 {
        return Ok(());
    }

    let key = |name: &str| -> Result<String> {
        Ok(duplicates
            .column(name)?
            .as_materialized_series()
            .str_value(0)?
            .into_owned())
    };

    Err(PrepError::DuplicateKey {
        date: key(DATE)?,
        stock_id: key(STOCK_ID)?,
    })
}

/// Date-indexed table of 1-month returns, one column per complete entity.
///
/// The first column is `date`; the remaining columns are entity ids.
#[derive(Debug, Clone, Display, Into)]
pub struct ReturnsMatrix(DataFrame);

impl ReturnsMatrix {
    /// The underlying wide frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.0
    }

    /// Entity ids in column order.
    pub fn entities(&self) -> Vec<String> {
        self.0
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != DATE)
            .map(|name| name.to_string())
            .collect()
    }

    /// Row dates in ascending order.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(self
            .0
            .column(DATE)?
            .date()?
            .as_date_iter()
            .flatten()
            .collect())
    }

    /// `(dates, entities)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.0.height(), self.0.width().saturating_sub(1))
    }

    /// Reshape back to long form: `date`, `stock_id`, `R1M_Usd`.
    ///
    /// Absent cells are omitted, so the result holds exactly the observations
    /// of the complete entities. Rows are ordered by entity, then date.
    pub fn to_long(&self) -> Result<DataFrame> {
        let frames: Vec<LazyFrame> = self
            .entities()
            .into_iter()
            .map(|id| {
                self.0
                    .clone()
                    .lazy()
                    .select([
                        col(DATE),
                        lit(id.clone()).alias(STOCK_ID),
                        col(id.as_str()).alias(R1M),
                    ])
                    .filter(col(R1M).is_not_null())
            })
            .collect();

        if frames.is_empty() {
            let empty = DataFrame::new(vec![
                Column::new_empty(DATE.into(), &DataType::Date),
                Column::new_empty(STOCK_ID.into(), &DataType::String),
                Column::new_empty(R1M.into(), &DataType::Float64),
            ])?;
            return Ok(empty);
        }

        Ok(concat(frames, UnionArgs::default())?.collect()?)
    }

    /// Dense `dates x entities` array with NaN for absent cells.
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let entities = self.entities();
        let mut values = Array2::from_elem((self.0.height(), entities.len()), f64::NAN);

        for (j, id) in entities.iter().enumerate() {
            let column = self.0.column(id)?.f64()?;
            for (i, value) in column.into_iter().enumerate() {
                if let Some(value) = value {
                    values[[i, j]] = value;
                }
            }
        }

        Ok(values)
    }
}
