// ============================================================
// Layer 4 - Image Sanitizer
// ============================================================
// Offline cleaning pass, run before any training:
//
//   1. mirror the raw tree into the clean tree (dirs + files,
//      relative structure preserved)
//   2. try to decode every file in the clean tree; delete the
//      ones that are not valid images
//   3. report per-class retention (raw count vs surviving count)
//
// The raw tree is never touched. Mirroring uses merge semantics:
// existing destination files are overwritten, so running the
// pass twice never fails, and a second run over an already-clean
// tree deletes nothing.
//
// The decode-and-delete step is the only local error recovery in
// the whole pipeline. A bad file is logged, removed from the
// clean tree, and the pass continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::data::preprocessor::decode_image;
use crate::domain::errors::PipelineError;

/// Per-class retention after a sanitization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRetention {
    /// Top-level class directory name
    pub class: String,
    /// File count in the raw class directory
    pub raw: usize,
    /// File count surviving in the clean class directory
    pub kept: usize,
}

/// Mirror `raw_dir` into `clean_dir`, drop files that fail to
/// decode as images, and report per-class retention in sorted
/// class order.
pub fn sanitize(raw_dir: &Path, clean_dir: &Path) -> Result<Vec<ClassRetention>> {
    if !raw_dir.is_dir() {
        return Err(PipelineError::NotFound(raw_dir.to_path_buf()).into());
    }

    mirror_tree(raw_dir, clean_dir)?;
    remove_non_images(clean_dir)?;

    let report = retention_report(raw_dir, clean_dir)?;
    Ok(report)
}

/// Copy the raw tree into the clean tree, preserving relative
/// structure. Existing destination files are overwritten.
fn mirror_tree(raw_dir: &Path, clean_dir: &Path) -> Result<()> {
    for entry in WalkDir::new(raw_dir) {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk aborted"));
            PipelineError::io(raw_dir, io)
        })?;

        // every walked path sits under the walk root
        let Ok(rel) = entry.path().strip_prefix(raw_dir) else {
            continue;
        };
        let dst = clean_dir.join(rel);

        if entry.file_type().is_dir() {
            if dst.is_file() {
                return Err(PipelineError::Copy {
                    src: entry.path().to_path_buf(),
                    dst,
                }
                .into());
            }
            fs::create_dir_all(&dst).map_err(|e| PipelineError::io(&dst, e))?;
        } else {
            if dst.is_dir() {
                return Err(PipelineError::Copy {
                    src: entry.path().to_path_buf(),
                    dst,
                }
                .into());
            }
            fs::copy(entry.path(), &dst).map_err(|e| PipelineError::io(&dst, e))?;
        }
    }
    Ok(())
}

/// Decode-check every file under `clean_dir` in sorted order and
/// delete the ones that are not readable images.
fn remove_non_images(clean_dir: &Path) -> Result<()> {
    let mut files: Vec<PathBuf> = WalkDir::new(clean_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let bar = ProgressBar::new(files.len() as u64).with_style(ProgressStyle::default_bar());
    bar.set_message("Checking images");

    let mut removed = 0usize;
    for path in &files {
        if let Err(e) = decode_image(path) {
            tracing::warn!("Un-linking '{}': {}", path.display(), e);
            fs::remove_file(path).map_err(|e| PipelineError::io(path, e))?;
            removed += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    tracing::info!(
        "Checked {} files, removed {} that failed to decode",
        files.len(),
        removed
    );
    Ok(())
}

/// Count files directly inside each top-level class directory of
/// both trees. Classes are reported in sorted name order.
fn retention_report(raw_dir: &Path, clean_dir: &Path) -> Result<Vec<ClassRetention>> {
    let mut classes: Vec<String> = fs::read_dir(raw_dir)
        .map_err(|e| PipelineError::io(raw_dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(String::from))
        .collect();
    classes.sort();

    let mut report = Vec::with_capacity(classes.len());
    for class in classes {
        let raw = count_files(&raw_dir.join(&class))?;
        let kept = count_files(&clean_dir.join(&class))?;
        report.push(ClassRetention { class, raw, kept });
    }
    Ok(report)
}

fn count_files(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let count = fs::read_dir(dir)
        .map_err(|e| PipelineError::io(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .count();
    Ok(count)
}
