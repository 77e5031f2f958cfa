// ============================================================
// Layer 5 — Decision Tree (CART)
// ============================================================
// A single classification tree, grown top-down:
//
//   1. At each node, consider a random subset of features
//      (max_features of them, drawn fresh per node)
//   2. For each candidate feature, sort the node's samples by
//      value and scan split thresholds at midpoints between
//      distinct consecutive values
//   3. Keep the split with the lowest weighted Gini impurity
//   4. Recurse until a stopping rule fires (pure node, depth
//      limit, min_samples_split, or no impurity-reducing split)
//
// Leaves store the NORMALISED class distribution of their
// training samples, not just the majority label. The forest
// averages these distributions across trees, which is what
// makes predict_proba smooth instead of a step function of
// vote counts.
//
// The tree is stored as a flat Vec of nodes indexed by usize,
// so serialisation is trivial and prediction is a tight loop
// with no pointer chasing.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Stopping and randomisation rules for growing one tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum tree depth; None grows until other rules stop it
    pub max_depth: Option<usize>,
    /// A node with fewer samples than this becomes a leaf
    pub min_samples_split: usize,
    /// Both sides of a split must keep at least this many samples
    pub min_samples_leaf: usize,
    /// Features considered per node (the forest passes sqrt(d))
    pub max_features: usize,
}

/// One node of the flattened tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Internal node: rows with value <= threshold go left
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
    /// Terminal node: normalised class distribution
    Leaf { distribution: Vec<f64> },
}

/// A fitted CART classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes:      Vec<Node>,
    n_features: usize,
    n_classes:  usize,
}

impl DecisionTree {
    /// Grow a tree on the given sample rows of `x`.
    ///
    /// `samples` may contain repeats — the forest passes a
    /// bootstrap sample. `rng` drives the per-node feature
    /// subsampling and belongs to the calling tree slot, so a
    /// fixed forest seed reproduces the exact same tree.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        n_classes: usize,
        samples: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(samples.to_vec(), 0);
        DecisionTree {
            nodes:      builder.nodes,
            n_features: x.ncols(),
            n_classes,
        }
    }

    /// Walk the tree for one encoded row and return the leaf's
    /// class distribution.
    pub fn predict_distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Class index with the highest leaf probability for one row
    pub fn predict(&self, row: &[f64]) -> usize {
        let dist = self.predict_distribution(row);
        argmax(dist)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the tree; a single-leaf tree has depth 0
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }
}

/// First index of the largest value (ties go to the lower index)
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

// ─── Tree growing internals ──────────────────────────────────────────────────

/// Transient state while growing one tree. Borrows the training
/// data; the finished node Vec is moved out at the end of fit().
struct TreeBuilder<'a> {
    x:         &'a Array2<f64>,
    y:         &'a [usize],
    n_classes: usize,
    params:    &'a TreeParams,
    rng:       &'a mut StdRng,
    nodes:     Vec<Node>,
}

/// The best split found at a node
struct Split {
    feature:   usize,
    threshold: f64,
    impurity:  f64,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `samples` and return its node index.
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&samples);
        let node_gini = gini(&counts, samples.len());

        // Stopping rules: pure node, too small, or depth limit
        let depth_reached =
            self.params.max_depth.map_or(false, |max| depth >= max);
        if node_gini == 0.0
            || samples.len() < self.params.min_samples_split
            || depth_reached
        {
            return self.push_leaf(&counts, samples.len());
        }

        let split = match self.best_split(&samples, node_gini) {
            Some(s) => s,
            // No split improves impurity (e.g. identical rows with
            // different labels)
            None => return self.push_leaf(&counts, samples.len()),
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&row| self.x[[row, split.feature]] <= split.threshold);

        // Reserve this node's slot before recursing so children
        // land after their parent; patch the child indices after.
        let node_idx = self.nodes.len();
        self.nodes.push(Node::Split {
            feature:   split.feature,
            threshold: split.threshold,
            left:      0,
            right:     0,
        });

        let left_idx = self.grow(left_samples, depth + 1);
        let right_idx = self.grow(right_samples, depth + 1);

        if let Node::Split { left, right, .. } = &mut self.nodes[node_idx] {
            *left = left_idx;
            *right = right_idx;
        }

        node_idx
    }

    /// Add a leaf with the normalised class distribution
    fn push_leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let n = total.max(1) as f64;
        let distribution = counts.iter().map(|&c| c as f64 / n).collect();
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution });
        idx
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &row in samples {
            counts[self.y[row]] += 1;
        }
        counts
    }

    /// Search a random feature subset for the impurity-minimising
    /// split. Returns None when no candidate beats the node's own
    /// Gini impurity.
    fn best_split(&mut self, samples: &[usize], node_gini: f64) -> Option<Split> {
        let n = samples.len();

        // Fresh random feature subset for this node
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);
        features.truncate(self.params.max_features.max(1));

        let total_counts = self.class_counts(samples);
        let mut best: Option<Split> = None;

        for &feature in &features {
            // Sort this node's samples by the candidate feature
            let mut ordered: Vec<(f64, usize)> = samples
                .iter()
                .map(|&row| (self.x[[row, feature]], self.y[row]))
                .collect();
            ordered.sort_by(|a, b| {
                a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
            });

            // Scan thresholds between distinct consecutive values,
            // maintaining left-side class counts incrementally
            let mut left_counts = vec![0usize; self.n_classes];
            for i in 0..n - 1 {
                left_counts[ordered[i].1] += 1;

                if ordered[i].0 == ordered[i + 1].0 {
                    continue; // same value, not a valid cut point
                }

                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < self.params.min_samples_leaf
                    || n_right < self.params.min_samples_leaf
                {
                    continue;
                }

                let right_counts: Vec<usize> = total_counts
                    .iter()
                    .zip(&left_counts)
                    .map(|(t, l)| t - l)
                    .collect();

                let weighted = (n_left as f64 * gini(&left_counts, n_left)
                    + n_right as f64 * gini(&right_counts, n_right))
                    / n as f64;

                let beats_current =
                    best.as_ref().map_or(true, |b| weighted < b.impurity);
                if beats_current && weighted + 1e-12 < node_gini {
                    best = Some(Split {
                        feature,
                        threshold: (ordered[i].0 + ordered[i + 1].0) / 2.0,
                        impurity: weighted,
                    });
                }
            }
        }

        best
    }
}

/// Gini impurity of a class count vector: 1 - Σ (c/n)²
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}
