//! Train/test partition at a cutoff date.

use crate::{
    PrepError, Result,
    schema::{DATE, ymd},
    traits::PanelFrame,
};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

/// Default first date of the testing period.
pub const DEFAULT_CUTOFF: NaiveDate = ymd(2014, 1, 15);

/// Partition `panel` into `(train, test)`.
///
/// Training holds every row dated strictly before `cutoff`, testing every row
/// dated on or after it. Each side keeps the input order.
///
/// # Errors
///
/// [`PrepError::NullDates`] if any row has no date, since such a row would
/// belong to neither side.
pub fn split<P: PanelFrame>(panel: &P, cutoff: NaiveDate) -> Result<(P, P)> {
    panel.require_columns(&[DATE])?;

    let null_dates = panel.frame().column(DATE)?.null_count();
    if null_dates > 0 {
        return Err(PrepError::NullDates(null_dates));
    }

    let train = panel.lazy().filter(col(DATE).lt(lit(cutoff))).collect()?;
    let test = panel.lazy().filter(col(DATE).gt_eq(lit(cutoff))).collect()?;
    info!(
        %cutoff,
        train = train.height(),
        test = test.height(),
        "split panel into training and testing samples"
    );

    Ok((P::from(train), P::from(test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Panel;

    fn panel() -> Panel {
        let df = df![
            "stock_id" => [1, 2, 1, 2, 1, 2],
            "date" => [
                "2013-12-31", "2013-12-31",
                "2014-01-15", "2014-01-15",
                "2014-01-31", "2014-01-31",
            ],
            "R1M_Usd" => [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
        ]
        .unwrap();
        Panel::try_from_frame(df).unwrap()
    }

    #[test]
    fn test_default_cutoff() {
        assert_eq!(DEFAULT_CUTOFF, NaiveDate::from_ymd_opt(2014, 1, 15).unwrap());
    }

    #[test]
    fn test_cutoff_day_goes_to_test() {
        let (train, test) = split(&panel(), DEFAULT_CUTOFF).unwrap();

        assert_eq!(train.height(), 2);
        assert_eq!(test.height(), 4);
        assert!(train.dates().unwrap().iter().all(|d| *d < DEFAULT_CUTOFF));
        assert!(test.dates().unwrap().iter().all(|d| *d >= DEFAULT_CUTOFF));
    }

    #[test]
    fn test_split_preserves_order() {
        let (_, test) = split(&panel(), DEFAULT_CUTOFF).unwrap();
        let returns: Vec<f64> = test
            .frame()
            .column("R1M_Usd")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();

        assert_eq!(returns, vec![0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_cutoff_outside_panel() {
        let early = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let (train, test) = split(&panel(), early).unwrap();

        assert!(train.is_empty());
        assert_eq!(test.height(), 6);
    }

    #[test]
    fn test_split_rejects_null_dates() {
        let df = df![
            "stock_id" => [1, 2],
            "date" => [Some("2013-12-31"), None],
        ]
        .unwrap();
        let panel = Panel::try_from_frame(df).unwrap();

        assert!(matches!(
            split(&panel, DEFAULT_CUTOFF),
            Err(PrepError::NullDates(1))
        ));
    }
}
