// ============================================================
// Layer 6 - Training Report
// ============================================================
// Renders the four history curves onto one PNG chart:
//
//   red     training loss
//   blue    validation loss
//   green   training accuracy
//   magenta validation accuracy
//
// X axis is the epoch index, Y axis spans [0, max(series)].
// Parent directories are created if absent and any prior report
// is overwritten. Render or write failures are fatal.
//
// The renderer is built against plotters' bitmap backend only,
// with font-based layers (caption, tick labels, legend) left
// out so the binary never depends on system font libraries;
// the CSV written next to the chart carries the exact numbers.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

use crate::domain::errors::PipelineError;
use crate::infra::history::TrainingHistory;

const CHART_SIZE: (u32, u32) = (960, 720);

/// Render the loss/accuracy curves of one training run.
pub fn render_history(history: &TrainingHistory, path: &Path) -> Result<()> {
    if history.is_empty() {
        return Err(anyhow!("cannot plot an empty training history"));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let epochs = history.epochs();
    let x_max = (epochs.len().saturating_sub(1)).max(1) as f64;
    let y_max = epochs
        .iter()
        .flat_map(|m| [m.train_loss, m.val_loss, m.train_acc, m.val_acc])
        .fold(1.0f64, f64::max)
        * 1.05;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .x_label_area_size(24)
        .y_label_area_size(32)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    // one flat buffer per curve, epoch order
    let series = [
        (collect(epochs, |m| m.train_loss), RED),
        (collect(epochs, |m| m.val_loss), BLUE),
        (collect(epochs, |m| m.train_acc), GREEN),
        (collect(epochs, |m| m.val_acc), MAGENTA),
    ];

    for (values, color) in &series {
        chart.draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            color,
        ))?;
    }

    root.present()?;
    tracing::info!("Training chart written to '{}'", path.display());
    Ok(())
}

fn collect(
    epochs: &[crate::infra::history::EpochMetrics],
    f: impl Fn(&crate::infra::history::EpochMetrics) -> f64,
) -> Vec<f64> {
    epochs.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::history::EpochMetrics;

    fn history(n: usize) -> TrainingHistory {
        let mut h = TrainingHistory::new();
        for epoch in 1..=n {
            h.push(EpochMetrics {
                epoch,
                train_loss: 1.2 / epoch as f64,
                val_loss: 1.4 / epoch as f64,
                train_acc: 0.3 + 0.1 * epoch as f64,
                val_acc: 0.25 + 0.1 * epoch as f64,
            });
        }
        h
    }

    #[test]
    fn test_renders_png_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/training_history.png");
        render_history(&history(5), &path).unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
        // the output decodes as a valid image
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_history.png");
        render_history(&history(3), &path).unwrap();
        render_history(&history(6), &path).unwrap();
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_empty_history_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(render_history(&TrainingHistory::new(), &path).is_err());
    }

    #[test]
    fn test_single_epoch_history_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.png");
        render_history(&history(1), &path).unwrap();
        assert!(path.is_file());
    }
}
