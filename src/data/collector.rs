// ============================================================
// Layer 4 - File Collector
// ============================================================
// Enumerates every sample file under a class-per-directory root
// and returns them in a reproducible shuffled order.
//
// Ordering contract:
//   1. recursive walk, files only
//   2. sort lexicographically by full path (walk order is
//      filesystem-dependent, sorting fixes it)
//   3. Fisher-Yates shuffle seeded with SHUFFLE_SEED
//
// Two calls over the same tree therefore return the same
// sequence, which in turn makes the downstream train/validation
// split reproducible.

use std::path::Path;

use anyhow::Result;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use walkdir::WalkDir;

use crate::domain::errors::PipelineError;
use crate::domain::labeled_path::LabeledPath;

/// Fixed shuffle seed shared by every training run
pub const SHUFFLE_SEED: u64 = 42;

/// Collect all files under `root`, labelled by parent directory,
/// in deterministic shuffled order.
///
/// A missing root is an error; an existing but empty root yields
/// an empty vec.
pub fn collect_labeled_paths(root: &Path, seed: u64) -> Result<Vec<LabeledPath>> {
    if !root.is_dir() {
        return Err(PipelineError::NotFound(root.to_path_buf()).into());
    }

    let mut paths: Vec<LabeledPath> = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk aborted"));
            PipelineError::io(root, io)
        })?;
        if entry.file_type().is_file() {
            if let Some(lp) = LabeledPath::from_path(entry.into_path()) {
                paths.push(lp);
            }
        }
    }

    // sort_by_file_name orders siblings, not full paths
    paths.sort_by(|a, b| a.path.cmp(&b.path));

    let mut rng = StdRng::seed_from_u64(seed);
    paths.shuffle(&mut rng);

    tracing::info!("Collected {} sample files under '{}'", paths.len(), root.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn seed_tree(root: &Path) {
        for (class, files) in [("apple", 4usize), ("banana", 3usize)] {
            let dir = root.join(class);
            fs::create_dir_all(&dir).unwrap();
            for i in 0..files {
                fs::write(dir.join(format!("img_{i}.jpg")), b"x").unwrap();
            }
        }
    }

    #[test]
    fn test_same_seed_same_ordering() {
        let dir = tempfile::tempdir().unwrap();
        seed_tree(dir.path());

        let first = collect_labeled_paths(dir.path(), SHUFFLE_SEED).unwrap();
        let second = collect_labeled_paths(dir.path(), SHUFFLE_SEED).unwrap();

        let a: Vec<_> = first.iter().map(|p| p.path.clone()).collect();
        let b: Vec<_> = second.iter().map(|p| p.path.clone()).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
    }

    #[test]
    fn test_labels_come_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        seed_tree(dir.path());

        let paths = collect_labeled_paths(dir.path(), SHUFFLE_SEED).unwrap();
        assert_eq!(paths.iter().filter(|p| p.label == "apple").count(), 4);
        assert_eq!(paths.iter().filter(|p| p.label == "banana").count(), 3);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_labeled_paths(&missing, SHUFFLE_SEED).is_err());
    }

    #[test]
    fn test_empty_root_yields_empty_vec() {
        let dir = tempfile::tempdir().unwrap();
        let paths = collect_labeled_paths(dir.path(), SHUFFLE_SEED).unwrap();
        assert!(paths.is_empty());
    }
}
