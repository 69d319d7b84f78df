//! Cross-sectional median labels.
//!
//! For every date, each labeled return is compared with the median of that
//! return across all entities observed on the same date. The label is 1.0
//! when the entity's return strictly exceeds the median and 0.0 otherwise,
//! so ties at the median never count as outperformance.

use crate::{
    LabeledPanel, Result,
    schema::{DATE, LABELED_RETURNS, label_column, median_column},
    traits::PanelFrame,
};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How a missing or NaN return is labeled.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLabels {
    /// Missing returns get a null label
    #[default]
    Null,
    /// Missing returns get 0.0, the same as "not above the median"
    Zero,
}

/// Median reference table: one row per date with the median of each
/// labeled return, sorted by date.
pub fn cross_sectional_medians<P: PanelFrame>(panel: &P) -> Result<DataFrame> {
    let mut required = vec![DATE];
    required.extend(LABELED_RETURNS);
    panel.require_columns(&required)?;

    let aggs: Vec<Expr> = LABELED_RETURNS
        .iter()
        .map(|name| return_value(name).median().alias(median_column(name)))
        .collect();

    let medians = panel
        .lazy()
        .group_by([col(DATE)])
        .agg(aggs)
        .sort([DATE], Default::default())
        .collect()?;

    Ok(medians)
}

/// Append `R1M_Usd_C` and `R12M_Usd_C` with missing returns labeled null.
pub fn label_panel<P: PanelFrame>(panel: &P) -> Result<LabeledPanel> {
    label_panel_with(panel, MissingLabels::default())
}

/// Append `R1M_Usd_C` and `R12M_Usd_C` under the given missing-value policy.
///
/// Row order and membership are those of `panel`. The per-date medians are
/// window aggregates over `date`, which is the same as joining the median
/// reference table back on `date`, and they never leave the expression.
pub fn label_panel_with<P: PanelFrame>(panel: &P, policy: MissingLabels) -> Result<LabeledPanel> {
    let mut required = vec![DATE];
    required.extend(LABELED_RETURNS);
    panel.require_columns(&required)?;

    let labels: Vec<Expr> = LABELED_RETURNS
        .iter()
        .map(|name| median_label(name, policy))
        .collect();

    let labeled = LabeledPanel::from(panel.lazy().with_columns(labels).collect()?);

    let (missing_short, missing_long) = labeled.missing_labels()?;
    if missing_short + missing_long > 0 {
        warn!(
            missing_short,
            missing_long, "returns without a value produced null labels"
        );
    }
    info!(rows = labeled.height(), %policy, "labeled panel against cross-sectional medians");

    Ok(labeled)
}

/// Return column as Float64 with NaN mapped to null.
fn return_value(name: &str) -> Expr {
    col(name).cast(DataType::Float64).fill_nan(lit(NULL))
}

fn median_label(name: &str, policy: MissingLabels) -> Expr {
    let value = return_value(name);
    let median = value.clone().median().over([col(DATE)]);

    // A null comparison falls through to `otherwise`.
    let above = when(value.clone().gt(median))
        .then(lit(1.0))
        .otherwise(lit(0.0));

    let label = match policy {
        MissingLabels::Zero => above,
        MissingLabels::Null => when(value.is_null())
            .then(lit(NULL).cast(DataType::Float64))
            .otherwise(above),
    };

    label.alias(label_column(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Panel, PrepError};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn labels(panel: &LabeledPanel, column: &str) -> Vec<Option<f64>> {
        panel
            .frame()
            .column(column)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn three_dates() -> Panel {
        let df = df![
            "stock_id" => [1, 2, 3, 1, 2, 3, 1, 2, 3],
            "date" => [
                "2000-01-31", "2000-01-31", "2000-01-31",
                "2000-02-29", "2000-02-29", "2000-02-29",
                "2000-03-31", "2000-03-31", "2000-03-31",
            ],
            "R1M_Usd" => [1.0, 2.0, 3.0, 5.0, 5.0, 5.0, -1.0, 0.0, 10.0],
            "R12M_Usd" => [0.3, 0.2, 0.1, 0.0, 1.0, 2.0, 4.0, 4.0, 5.0],
        ]
        .unwrap();
        Panel::try_from_frame(df).unwrap()
    }

    #[test]
    fn test_median_labels_scenario() {
        let labeled = label_panel(&three_dates()).unwrap();

        let short: Vec<f64> = labels(&labeled, "R1M_Usd_C").into_iter().flatten().collect();
        assert_eq!(short, vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

        let long: Vec<f64> = labels(&labeled, "R12M_Usd_C").into_iter().flatten().collect();
        assert_eq!(long, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_labeling_keeps_rows_and_drops_helpers() {
        let panel = three_dates();
        let labeled = label_panel(&panel).unwrap();

        assert_eq!(labeled.height(), panel.height());
        assert_eq!(labeled.frame().width(), panel.frame().width() + 2);
        assert!(labeled.frame().column("R1M_Usd_median").is_err());
        let ids = |frame: &DataFrame| -> Vec<i32> {
            frame
                .column("stock_id")
                .unwrap()
                .i32()
                .unwrap()
                .into_no_null_iter()
                .collect()
        };
        assert_eq!(ids(labeled.frame()), ids(panel.frame()));
    }

    #[test]
    fn test_single_entity_date_is_never_above_median() {
        let df = df![
            "stock_id" => [7],
            "date" => ["2005-05-31"],
            "R1M_Usd" => [0.42],
            "R12M_Usd" => [-0.1],
        ]
        .unwrap();
        let labeled = label_panel(&Panel::try_from_frame(df).unwrap()).unwrap();

        assert_eq!(labels(&labeled, "R1M_Usd_C"), vec![Some(0.0)]);
        assert_eq!(labels(&labeled, "R12M_Usd_C"), vec![Some(0.0)]);
    }

    #[rstest]
    #[case(MissingLabels::Null, None)]
    #[case(MissingLabels::Zero, Some(0.0))]
    fn test_missing_return_policy(#[case] policy: MissingLabels, #[case] expected: Option<f64>) {
        let df = df![
            "stock_id" => [1, 2, 3],
            "date" => ["2001-01-31", "2001-01-31", "2001-01-31"],
            "R1M_Usd" => [Some(0.1), None, Some(f64::NAN)],
            "R12M_Usd" => [0.1, 0.2, 0.3],
        ]
        .unwrap();
        let labeled = label_panel_with(&Panel::try_from_frame(df).unwrap(), policy).unwrap();

        let short = labels(&labeled, "R1M_Usd_C");
        // Only one usable value, which is its own median.
        assert_eq!(short[0], Some(0.0));
        assert_eq!(short[1], expected);
        assert_eq!(short[2], expected);
        assert_eq!(labels(&labeled, "R12M_Usd_C"), vec![Some(0.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_cross_sectional_medians() {
        let medians = cross_sectional_medians(&three_dates()).unwrap();

        assert_eq!(medians.height(), 3);
        let short = medians.column("R1M_Usd_median").unwrap().f64().unwrap();
        assert_relative_eq!(short.get(0).unwrap(), 2.0);
        assert_relative_eq!(short.get(1).unwrap(), 5.0);
        assert_relative_eq!(short.get(2).unwrap(), 0.0);
        let long = medians.column("R12M_Usd_median").unwrap().f64().unwrap();
        assert_relative_eq!(long.get(2).unwrap(), 4.0);
    }

    #[test]
    fn test_even_group_median_is_midpoint() {
        let df = df![
            "stock_id" => [1, 2, 3, 4],
            "date" => ["2002-06-28", "2002-06-28", "2002-06-28", "2002-06-28"],
            "R1M_Usd" => [1.0, 2.0, 3.0, 4.0],
            "R12M_Usd" => [1.0, 1.0, 1.0, 1.0],
        ]
        .unwrap();
        let labeled = label_panel(&Panel::try_from_frame(df).unwrap()).unwrap();

        assert_eq!(
            labels(&labeled, "R1M_Usd_C"),
            vec![Some(0.0), Some(0.0), Some(1.0), Some(1.0)]
        );
        assert_eq!(
            labels(&labeled, "R12M_Usd_C"),
            vec![Some(0.0), Some(0.0), Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn test_label_requires_return_columns() {
        let df = df![
            "stock_id" => [1],
            "date" => ["2002-06-28"],
            "R1M_Usd" => [1.0],
        ]
        .unwrap();
        let result = label_panel(&Panel::try_from_frame(df).unwrap());

        assert!(matches!(result, Err(PrepError::MissingColumn(name)) if name == "R12M_Usd"));
    }
}
