//! End-to-end preparation run.

use crate::{
    LabeledPanel, Panel, Result,
    config::PipelineConfig,
    features::{FeatureSet, select_features},
    filter::filter_dates,
    labels::label_panel_with,
    loader::load_panel,
    split::split,
    traits::PanelFrame,
    universe::{ReturnsMatrix, build_returns_matrix},
};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{info, info_span};

/// Products of a preparation run.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Date-filtered panel with median labels
    pub labeled: LabeledPanel,
    /// Rows dated before the cutoff
    pub train: LabeledPanel,
    /// Rows dated on or after the cutoff
    pub test: LabeledPanel,
    /// 1-month returns of the complete entities
    pub returns: ReturnsMatrix,
    /// Feature columns resolved from the configured feature set
    pub features: Vec<String>,
}

impl PreparedData {
    /// Training sample restricted to `stock_id`, `date` and the features.
    pub fn train_features(&self) -> Result<DataFrame> {
        select_features(&self.train, &FeatureSet::Custom(self.features.clone()))
    }

    /// Testing sample restricted to `stock_id`, `date` and the features.
    pub fn test_features(&self) -> Result<DataFrame> {
        select_features(&self.test, &FeatureSet::Custom(self.features.clone()))
    }
}

/// Load, filter, label, split and reshape a panel.
///
/// Each stage consumes the previous stage's output by reference and returns
/// a new table.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the CSV at `path` and prepare it.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PreparedData> {
        let panel = load_panel(path)?;
        self.prepare(&panel)
    }

    /// Prepare an already loaded panel.
    pub fn prepare(&self, panel: &Panel) -> Result<PreparedData> {
        let span = info_span!("prepare", rows = panel.height());
        let _guard = span.enter();

        self.config.validate()?;
        let filtered = filter_dates(panel, &self.config.window)?;
        let labeled = label_panel_with(&filtered, self.config.missing_labels)?;
        let features = self.config.features.resolve(&labeled)?;
        let (train, test) = split(&labeled, self.config.cutoff)?;
        let returns = build_returns_matrix(&labeled)?;

        info!(
            labeled = labeled.height(),
            train = train.height(),
            test = test.height(),
            features = features.len(),
            "prepared panel"
        );

        Ok(PreparedData {
            labeled,
            train,
            test,
            returns,
            features,
        })
    }
}
