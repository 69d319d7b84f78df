//! Named feature selection.
//!
//! Features are every column that is not an identifier, a forward return, a
//! label or a median helper. Selection is always by name, never by position.

use crate::{
    Result,
    schema::{DATE, FEATURES_SHORT, STOCK_ID, is_reserved},
    traits::PanelFrame,
};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Which feature columns to select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Every feature column of the panel
    #[default]
    All,
    /// The seven-feature short list
    Short,
    /// An explicit allow-list
    Custom(Vec<String>),
}

impl FeatureSet {
    /// Resolve to column names against `panel`.
    ///
    /// `All` yields the panel's feature columns in input order. `Short` and
    /// `Custom` yield their names after checking that each one exists.
    pub fn resolve<P: PanelFrame>(&self, panel: &P) -> Result<Vec<String>> {
        let names: Vec<String> = match self {
            Self::All => return Ok(feature_columns(panel)),
            Self::Short => FEATURES_SHORT.iter().map(|s| s.to_string()).collect(),
            Self::Custom(names) => names.clone(),
        };

        let columns: Vec<&str> = names.iter().map(String::as_str).collect();
        panel.require_columns(&columns)?;
        Ok(names)
    }
}

/// Feature columns of `panel` in input order.
pub fn feature_columns<P: PanelFrame>(panel: &P) -> Vec<String> {
    panel
        .frame()
        .get_column_names()
        .into_iter()
        .filter(|name| !is_reserved(name.as_str()))
        .map(|name| name.to_string())
        .collect()
}

/// `stock_id`, `date` and the features of `set`.
pub fn select_features<P: PanelFrame>(panel: &P, set: &FeatureSet) -> Result<DataFrame> {
    panel.require_columns(&[STOCK_ID, DATE])?;
    let names = set.resolve(panel)?;

    let mut columns = vec![col(STOCK_ID), col(DATE)];
    columns.extend(names.iter().map(|name| col(name.as_str())));

    Ok(panel.lazy().select(columns).collect()?)
}

/// All observations of a single date.
pub fn cross_section<P: PanelFrame>(panel: &P, date: NaiveDate) -> Result<DataFrame> {
    panel.require_columns(&[DATE])?;
    Ok(panel.lazy().filter(col(DATE).eq(lit(date))).collect()?)
}

/// Distinct entity ids, sorted.
pub fn entities<P: PanelFrame>(panel: &P) -> Result<Series> {
    panel.require_columns(&[STOCK_ID])?;

    let unique = panel
        .lazy()
        .select([col(STOCK_ID).unique().sort(Default::default())])
        .collect()?;

    Ok(unique.column(STOCK_ID)?.as_materialized_series().clone())
}
