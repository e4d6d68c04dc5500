// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags. clap's derive
// macros generate help text, missing-argument errors, and the
// string -> number conversions.
//
// The From impls at the bottom are the boundary between Layer 1
// and Layer 2: the application layer never sees clap types.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::layout::DataLayout;

/// The three top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitize the raw image tree into the cleaned tree
    Preprocess(PreprocessArgs),

    /// Train the classifier on the cleaned tree
    Train(TrainArgs),

    /// Classify one image with the trained model
    Predict(PredictArgs),
}

/// Arguments for the `preprocess` command
#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Raw image tree, one subdirectory per class
    #[arg(long, default_value = "generated_data/raw_data")]
    pub raw_dir: PathBuf,

    /// Destination for the sanitized mirror
    #[arg(long, default_value = "generated_data/cleaned_data")]
    pub cleaned_dir: PathBuf,
}

/// Arguments for the `train` command
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Sanitized image tree to train on
    #[arg(long, default_value = "generated_data/cleaned_data")]
    pub cleaned_dir: PathBuf,

    /// Directory for the model artifact
    #[arg(long, default_value = "generated_data/models")]
    pub model_dir: PathBuf,

    /// Directory for the history chart and CSV
    #[arg(long, default_value = "generated_data/plots")]
    pub plot_dir: PathBuf,

    /// Samples per optimizer step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Full passes over the training set
    #[arg(long, default_value_t = 25)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seed for the shuffle, the split, and the augmentation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of samples used for training (rest validate)
    #[arg(long, default_value_t = 0.75)]
    pub train_fraction: f64,
}

/// Arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Image to classify; a random cleaned image when omitted
    pub image: Option<PathBuf>,

    /// Directory holding the model artifact
    #[arg(long, default_value = "generated_data/models")]
    pub model_dir: PathBuf,

    /// Cleaned tree used for the random pick
    #[arg(long, default_value = "generated_data/cleaned_data")]
    pub cleaned_dir: PathBuf,
}

impl From<&PreprocessArgs> for DataLayout {
    fn from(a: &PreprocessArgs) -> Self {
        Self {
            raw_dir:     a.raw_dir.clone(),
            cleaned_dir: a.cleaned_dir.clone(),
            ..Self::default()
        }
    }
}

impl From<&TrainArgs> for DataLayout {
    fn from(a: &TrainArgs) -> Self {
        Self {
            cleaned_dir: a.cleaned_dir.clone(),
            model_dir:   a.model_dir.clone(),
            plot_dir:    a.plot_dir.clone(),
            ..Self::default()
        }
    }
}

impl From<&TrainArgs> for TrainConfig {
    fn from(a: &TrainArgs) -> Self {
        Self {
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            initial_lr:     a.lr,
            seed:           a.seed,
            train_fraction: a.train_fraction,
        }
    }
}

impl From<&PredictArgs> for DataLayout {
    fn from(a: &PredictArgs) -> Self {
        Self {
            model_dir:   a.model_dir.clone(),
            cleaned_dir: a.cleaned_dir.clone(),
            ..Self::default()
        }
    }
}
