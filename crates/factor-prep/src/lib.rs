#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/factor-prep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod labels;
pub mod loader;
pub mod panel;
pub mod pipeline;
pub mod schema;
pub mod split;
pub mod traits;
pub mod universe;

// Re-export core types
pub use config::PipelineConfig;
pub use error::{PrepError, Result};
pub use features::{FeatureSet, cross_section, entities, feature_columns, select_features};
pub use filter::{DateWindow, filter_dates};
pub use labels::{MissingLabels, cross_sectional_medians, label_panel, label_panel_with};
pub use loader::load_panel;
pub use panel::{LabeledPanel, Panel};
pub use pipeline::{Pipeline, PreparedData};
pub use split::split;
pub use traits::PanelFrame;
pub use universe::{ReturnsMatrix, build_returns_matrix, complete_entities, observation_counts};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
