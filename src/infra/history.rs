// ============================================================
// Layer 6 - Training History
// ============================================================
// Per-epoch metrics record, produced by the trainer and consumed
// by the reporter.
//
// Metrics per epoch:
//   - train_loss: average cross-entropy over the drawn batches
//   - val_loss:   average cross-entropy on the validation set
//   - train_acc:  fraction of augmented training samples
//                 classified correctly while training
//   - val_acc:    fraction of validation samples classified
//                 correctly
//
// The history is also written to CSV next to the plot, one row
// per epoch, overwritten on every run:
//
//   epoch,train_loss,val_loss,train_acc,val_acc
//   1,0.693100,0.687300,0.512000,0.540000
//   ...

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::errors::PipelineError;

/// One row of metrics for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number, starting at 1
    pub epoch: usize,

    /// Average cross-entropy over the epoch's training batches
    pub train_loss: f64,

    /// Average cross-entropy on the validation set
    pub val_loss: f64,

    /// Training accuracy in [0, 1]
    pub train_acc: f64,

    /// Validation accuracy in [0, 1]
    pub val_acc: f64,
}

/// Ordered-by-epoch record of one training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    /// Write the whole history as CSV, creating parent
    /// directories and overwriting any previous file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        let mut f = fs::File::create(path).map_err(|e| PipelineError::io(path, e))?;
        writeln!(f, "epoch,train_loss,val_loss,train_acc,val_acc")
            .map_err(|e| PipelineError::io(path, e))?;
        for m in &self.epochs {
            writeln!(
                f,
                "{},{:.6},{:.6},{:.6},{:.6}",
                m.epoch, m.train_loss, m.val_loss, m.train_acc, m.val_acc,
            )
            .map_err(|e| PipelineError::io(path, e))?;
        }

        tracing::debug!("Wrote {} epoch rows to '{}'", self.epochs.len(), path.display());
        Ok(())
    }
}
