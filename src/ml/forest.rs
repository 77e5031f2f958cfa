// ============================================================
// Layer 5 — Random Forest
// ============================================================
// A bagged ensemble of CART trees:
//
//   - each tree trains on a bootstrap sample (n rows drawn
//     with replacement from the training set)
//   - each tree gets its own RNG, seeded as base_seed + tree
//     index, so a forest seed reproduces every tree exactly
//   - each node considers only sqrt(n_features) candidate
//     features, which decorrelates the trees
//
// predict_proba averages the leaf class distributions over all
// trees; predict is the argmax of that average. Averaging
// distributions (rather than counting majority votes) gives
// smooth probabilities that genuinely sum to 1.

use anyhow::{bail, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::traits::Classifier;
use crate::ml::tree::{argmax, DecisionTree, TreeParams};

/// Hyperparameters for fitting a forest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Per-tree depth cap; None grows unbounded
    pub max_depth: Option<usize>,
    /// Minimum node size eligible for splitting
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Base RNG seed; tree i uses seed + i
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            min_samples_leaf:  1,
            seed:              42,
        }
    }
}

/// A fitted random-forest classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees:      Vec<DecisionTree>,
    n_features: usize,
    n_classes:  usize,
}

impl RandomForest {
    /// Fit a forest on an encoded design matrix.
    ///
    /// `y` holds class INDICES (positions in the schema's class
    /// list), one per row of `x`.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self> {
        let n_rows = x.nrows();
        let n_features = x.ncols();

        if n_rows == 0 || n_features == 0 {
            bail!("Cannot fit a forest on an empty design matrix");
        }
        if y.len() != n_rows {
            bail!(
                "Label count ({}) does not match row count ({})",
                y.len(),
                n_rows
            );
        }
        if n_classes < 2 {
            bail!("Need at least 2 classes, got {}", n_classes);
        }
        if params.n_estimators == 0 {
            bail!("n_estimators must be at least 1");
        }

        // sqrt(d) features per node, the standard forest default
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let tree_params = TreeParams {
            max_depth:         params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf:  params.min_samples_leaf,
            max_features,
        };

        let mut trees = Vec::with_capacity(params.n_estimators);
        for tree_idx in 0..params.n_estimators {
            // Derived seed: reproducible per tree, independent of
            // how many trees came before it
            let mut rng =
                StdRng::seed_from_u64(params.seed.wrapping_add(tree_idx as u64));

            // Bootstrap: n rows drawn with replacement
            let samples: Vec<usize> =
                (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();

            trees.push(DecisionTree::fit(
                x,
                y,
                n_classes,
                &samples,
                &tree_params,
                &mut rng,
            ));
        }

        tracing::debug!(
            "Fitted {} trees on {} rows x {} features",
            trees.len(),
            n_rows,
            n_features
        );

        Ok(Self { trees, n_features, n_classes })
    }

    /// Predicted class index for every row of a matrix
    pub fn predict_batch(&self, x: &Array2<f64>) -> Vec<usize> {
        x.rows()
            .into_iter()
            .map(|row| self.predict(&row.to_vec()))
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Mean of the per-tree leaf distributions
    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (slot, p) in acc.iter_mut().zip(tree.predict_distribution(features)) {
                *slot += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        for slot in &mut acc {
            *slot /= n;
        }
        acc
    }

    fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }
}
