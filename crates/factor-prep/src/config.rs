//! Pipeline configuration.

use crate::{
    PrepError, Result,
    features::FeatureSet,
    filter::DateWindow,
    labels::MissingLabels,
    split::DEFAULT_CUTOFF,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Parameters of a preparation run.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes:
///
/// ```json
/// { "cutoff": "2012-01-01", "features": "short", "missing_labels": "zero" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Open calendar window applied after loading
    pub window: DateWindow,
    /// First date of the testing sample
    pub cutoff: NaiveDate,
    /// Feature columns handed to downstream models
    pub features: FeatureSet,
    /// Labeling of missing returns
    pub missing_labels: MissingLabels,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DateWindow::default(),
            cutoff: DEFAULT_CUTOFF,
            features: FeatureSet::default(),
            missing_labels: MissingLabels::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PrepError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the window is non-empty.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()
    }
}
