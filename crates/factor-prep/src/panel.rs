//! Panel types: the raw observation panel and its labeled counterpart.

use crate::{
    Result,
    schema::{DATE, DATE_FORMAT, R1M_LABEL, R12M_LABEL},
    traits::PanelFrame,
};
use derive_more::{Display, From, Into};
use polars::prelude::*;
use tracing::debug;

/// Panel of stock-level observations, one row per (`stock_id`, `date`).
///
/// Rows keep the order of the input. Uniqueness of (`stock_id`, `date`) is
/// not checked here; the returns matrix builder validates it where it
/// matters.
#[derive(Debug, Clone, Display, From, Into)]
pub struct Panel(DataFrame);

impl Panel {
    /// Wrap a frame, parsing a textual `date` column into a `Date`.
    pub fn try_from_frame(frame: DataFrame) -> Result<Self> {
        Ok(Self(parse_dates(frame)?))
    }

    /// Consume the panel and return the frame.
    pub fn into_frame(self) -> DataFrame {
        self.0
    }
}

impl PanelFrame for Panel {
    fn frame(&self) -> &DataFrame {
        &self.0
    }
}

/// Panel carrying the `R1M_Usd_C` and `R12M_Usd_C` median labels.
#[derive(Debug, Clone, Display, From, Into)]
pub struct LabeledPanel(DataFrame);

impl LabeledPanel {
    /// Consume the panel and return the frame.
    pub fn into_frame(self) -> DataFrame {
        self.0
    }

    /// Number of null labels per label column, `(R1M_Usd_C, R12M_Usd_C)`.
    pub fn missing_labels(&self) -> Result<(usize, usize)> {
        Ok((
            self.0.column(R1M_LABEL)?.null_count(),
            self.0.column(R12M_LABEL)?.null_count(),
        ))
    }
}

impl PanelFrame for LabeledPanel {
    fn frame(&self) -> &DataFrame {
        &self.0
    }
}

/// Convert the `date` column to a polars `Date`.
///
/// Text must be `YYYY-MM-DD`; anything else is an error rather than a silent
/// null. Datetimes are truncated to their calendar day. Frames without a
/// `date` column pass through untouched.
pub(crate) fn parse_dates(frame: DataFrame) -> Result<DataFrame> {
    let dtype = match frame.column(DATE) {
        Ok(column) => column.dtype().clone(),
        Err(_) => return Ok(frame),
    };

    let parsed = match dtype {
        DataType::String => {
            debug!("parsing textual date column");
            frame
                .lazy()
                .with_column(col(DATE).str().to_date(StrptimeOptions {
                    format: Some(DATE_FORMAT.into()),
                    ..Default::default()
                }))
                .collect()?
        }
        DataType::Datetime(_, _) => frame
            .lazy()
            .with_column(col(DATE).cast(DataType::Date))
            .collect()?,
        _ => frame,
    };

    Ok(parsed)
}
