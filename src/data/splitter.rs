// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// The shuffle is seeded, so the same input ordering and the same
// seed always produce the same split. Reproducibility here is a
// contract, not a convenience: the collector already fixed the
// input ordering for exactly this reason.
//
// Split ratio: 75% training, 25% validation (configurable).
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed)
/// * `train_fraction` - Proportion for training, e.g. 0.75
/// * `seed`           - Shuffle seed
pub fn split_train_val<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.75, 42);
        assert_eq!(train.len(), 75);
        assert_eq!(val.len(),   25);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items may be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.75, 42);
        assert_eq!(train.len() + val.len(), 50);
    }

    #[test]
    fn test_val_fraction_within_rounding() {
        for n in [7usize, 20, 33, 101] {
            let items: Vec<usize> = (0..n).collect();
            let (_, val)          = split_train_val(items, 0.75, 42);
            let fraction          = val.len() as f64 / n as f64;
            assert!((fraction - 0.25).abs() <= 0.5 / n as f64 + f64::EPSILON);
        }
    }

    #[test]
    fn test_same_seed_same_split() {
        let items: Vec<usize>    = (0..40).collect();
        let (train_a, val_a)     = split_train_val(items.clone(), 0.75, 7);
        let (train_b, val_b)     = split_train_val(items, 0.75, 7);
        assert_eq!(train_a, train_b);
        assert_eq!(val_a, val_b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.75, 42);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction sends everything to training
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, 42);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
