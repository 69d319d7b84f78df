//! CSV loading of the observation panel.

use crate::{PrepError, Result, panel::Panel, traits::PanelFrame};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Rows scanned when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Load a panel from a header-bearing CSV file.
///
/// Column types are inferred from content and a textual `date` column is
/// parsed into a `Date`. The schema is otherwise not validated: a stage that
/// needs an absent column reports it when it runs.
///
/// # Errors
///
/// [`PrepError::FileNotFound`] if `path` does not exist, or a polars error if
/// the file cannot be parsed.
pub fn load_panel(path: impl AsRef<Path>) -> Result<Panel> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PrepError::FileNotFound(path.to_path_buf()));
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let panel = Panel::try_from_frame(frame)?;
    info!(
        path = %path.display(),
        rows = panel.frame().height(),
        columns = panel.frame().width(),
        "loaded panel"
    );

    Ok(panel)
}
