// ============================================================
// Layer 3 - Data Layout
// ============================================================
// Storage roots for every pipeline stage, passed explicitly into
// each component. Nothing in the pipeline derives a path from
// the location of the executable or the source tree.
//
// On-disk convention:
//
//   generated_data/
//     raw_data/<class>/<files>       unsanitised input
//     cleaned_data/<class>/<files>   sanitised mirror of raw_data
//     models/                        model artifact + config + labels
//     plots/                         training history chart and CSV

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Filenames inside the model and plot directories.
pub const MODEL_FILE_STEM: &str = "model";
pub const TRAIN_CONFIG_FILE: &str = "train_config.json";
pub const LABELS_FILE: &str = "labels.json";
pub const HISTORY_PLOT_FILE: &str = "training_history.png";
pub const HISTORY_CSV_FILE: &str = "training_history.csv";

/// Storage roots for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLayout {
    /// Unsanitised input tree, one subdirectory per class
    pub raw_dir: PathBuf,

    /// Sanitised mirror of `raw_dir`
    pub cleaned_dir: PathBuf,

    /// Model artifact directory
    pub model_dir: PathBuf,

    /// Training report directory
    pub plot_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            raw_dir:     PathBuf::from("generated_data/raw_data"),
            cleaned_dir: PathBuf::from("generated_data/cleaned_data"),
            model_dir:   PathBuf::from("generated_data/models"),
            plot_dir:    PathBuf::from("generated_data/plots"),
        }
    }
}

impl DataLayout {
    pub fn plot_path(&self) -> PathBuf {
        self.plot_dir.join(HISTORY_PLOT_FILE)
    }

    pub fn history_csv_path(&self) -> PathBuf {
        self.plot_dir.join(HISTORY_CSV_FILE)
    }
}
