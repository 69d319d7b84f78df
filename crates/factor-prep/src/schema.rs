//! Column names and fixed constants of the observation panel.
//!
//! Every stage refers to columns by name through these constants, so a
//! reordered input file never changes which data a stage reads.

use chrono::NaiveDate;

/// Entity identifier column.
pub const STOCK_ID: &str = "stock_id";

/// Observation date column.
pub const DATE: &str = "date";

/// 1-month forward return in USD.
pub const R1M: &str = "R1M_Usd";

/// 3-month forward return in USD.
pub const R3M: &str = "R3M_Usd";

/// 6-month forward return in USD.
pub const R6M: &str = "R6M_Usd";

/// 12-month forward return in USD.
pub const R12M: &str = "R12M_Usd";

/// Forward return columns. None of these is ever treated as a feature.
pub const RETURN_COLUMNS: [&str; 4] = [R1M, R3M, R6M, R12M];

/// Returns that receive a median label.
pub const LABELED_RETURNS: [&str; 2] = [R1M, R12M];

/// Label column derived from [`R1M`].
pub const R1M_LABEL: &str = "R1M_Usd_C";

/// Label column derived from [`R12M`].
pub const R12M_LABEL: &str = "R12M_Usd_C";

/// Suffix of the per-date median helper columns.
pub const MEDIAN_SUFFIX: &str = "_median";

/// Observation count column produced by the universe selector.
pub const COUNT: &str = "count";

/// The seven-feature short list used for compact models.
pub const FEATURES_SHORT: [&str; 7] = [
    "Div_Yld",
    "Eps",
    "Mkt_Cap_12M_Usd",
    "Mom_11M_Usd",
    "Ocf",
    "Pb",
    "Vol1Y_Usd",
];

/// Textual date layout of the input file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name of the label column for a return column (`R1M_Usd` -> `R1M_Usd_C`).
pub fn label_column(return_column: &str) -> String {
    format!("{return_column}_C")
}

/// Name of the median helper column for a return column.
pub fn median_column(return_column: &str) -> String {
    format!("{return_column}{MEDIAN_SUFFIX}")
}

/// Whether a column carries data other than a feature value.
pub fn is_reserved(column: &str) -> bool {
    column == STOCK_ID
        || column == DATE
        || RETURN_COLUMNS.contains(&column)
        || column == R1M_LABEL
        || column == R12M_LABEL
        || column.ends_with(MEDIAN_SUFFIX)
}

pub(crate) const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_label_and_median_names() {
        assert_eq!(label_column(R1M), R1M_LABEL);
        assert_eq!(label_column(R12M), R12M_LABEL);
        assert_eq!(median_column(R1M), "R1M_Usd_median");
    }

    #[rstest]
    #[case("stock_id", true)]
    #[case("date", true)]
    #[case("R1M_Usd", true)]
    #[case("R6M_Usd", true)]
    #[case("R12M_Usd_C", true)]
    #[case("R12M_Usd_median", true)]
    #[case("Div_Yld", false)]
    #[case("Mom_11M_Usd", false)]
    fn test_is_reserved(#[case] column: &str, #[case] expected: bool) {
        assert_eq!(is_reserved(column), expected);
    }
}
