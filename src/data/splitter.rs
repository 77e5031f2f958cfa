// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Splits row indices into a training set and a held-out test
// set, stratified by class label:
//
//   - each class contributes (roughly) the same fraction of
//     its rows to the test set, so a rare class cannot end up
//     entirely in one side of the split
//   - the shuffle is seeded, so the same seed always produces
//     the same split (reproducible training runs)
//
// Why stratify?
//   With a plain random split a small class can land mostly in
//   the test set, leaving the model almost nothing to learn
//   from. Stratifying keeps class balance the same on both
//   sides of the split.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom with a
// seeded StdRng.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Split row indices into (train, test) index sets, stratified
/// by the class labels.
///
/// # Arguments
/// * `labels`    - class index per row (positions in the class list)
/// * `test_size` - fraction of each class to hold out, e.g. 0.2
/// * `seed`      - RNG seed; same seed = same split
///
/// Per-class test counts are rounded, and every class with at
/// least one row keeps at least one TRAINING row, so the model
/// always sees every class. Both returned sets are sorted.
pub fn split_train_test(
    labels: &[usize],
    test_size: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    // Group row indices by class. BTreeMap keeps class iteration
    // order deterministic across runs.
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut rows) in by_class {
        rows.shuffle(&mut rng);

        // Round the per-class test allocation, but never take the
        // whole class: at least one row stays in training.
        let n = rows.len();
        let mut n_test = ((n as f64) * test_size).round() as usize;
        if n_test >= n {
            n_test = n.saturating_sub(1);
        }

        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    // Sort so downstream row order is independent of the shuffle
    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(
        "Stratified split: {} train rows, {} test rows",
        train.len(),
        test.len()
    );

    (train, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rows_are_preserved() {
        let labels = vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        let (train, test) = split_train_test(&labels, 0.2, 42);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_stratified() {
        // 20 of class 0, 10 of class 1, 20% test
        let labels: Vec<usize> =
            (0..30).map(|i| if i < 20 { 0 } else { 1 }).collect();
        let (_, test) = split_train_test(&labels, 0.2, 7);

        let test_class0 = test.iter().filter(|&&r| labels[r] == 0).count();
        let test_class1 = test.iter().filter(|&&r| labels[r] == 1).count();
        assert_eq!(test_class0, 4); // 20% of 20
        assert_eq!(test_class1, 2); // 20% of 10
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels: Vec<usize> = (0..50).map(|i| i % 2).collect();
        let a = split_train_test(&labels, 0.3, 99);
        let b = split_train_test(&labels, 0.3, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_usually_differs() {
        let labels: Vec<usize> = (0..50).map(|i| i % 2).collect();
        let a = split_train_test(&labels, 0.3, 1);
        let b = split_train_test(&labels, 0.3, 2);
        assert_ne!(a.1, b.1);
    }

    #[test]
    fn test_every_class_keeps_a_training_row() {
        // A class with a single row must stay in training even
        // at an extreme test fraction
        let labels = vec![0, 0, 0, 1];
        let (train, _) = split_train_test(&labels, 0.9, 3);
        assert!(train.iter().any(|&r| labels[r] == 1));
        assert!(train.iter().any(|&r| labels[r] == 0));
    }
}
