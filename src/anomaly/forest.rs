use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::ScoringConfig;

use super::model::OutlierModel;

/// Per-tree subsample cap. Larger batches are subsampled down to this size.
const MAX_SUBSAMPLE: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn build(matrix: &[Vec<f64>], rows: Vec<usize>, max_depth: u32, rng: &mut StdRng) -> Self {
        Self {
            root: build_node(matrix, rows, 0, max_depth, rng),
        }
    }

    /// Edges traversed to isolate the row, plus the subtree adjustment at the
    /// leaf it lands in.
    fn path_length(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0u32;
        loop {
            match node {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    depth += 1;
                    node = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }
}

fn build_node(
    matrix: &[Vec<f64>],
    rows: Vec<usize>,
    depth: u32,
    max_depth: u32,
    rng: &mut StdRng,
) -> Node {
    if rows.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: rows.len() };
    }

    // Only features with spread among these rows can split them.
    let columns = matrix[rows[0]].len();
    let mut candidates = Vec::with_capacity(columns);
    for feature in 0..columns {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &row in &rows {
            let value = matrix[row][feature];
            if value < lo {
                lo = value;
            }
            if value > hi {
                hi = value;
            }
        }
        if hi > lo {
            candidates.push((feature, lo, hi));
        }
    }

    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(lo..hi);

    let (left, right): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&row| matrix[row][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(matrix, left, depth + 1, max_depth, rng)),
        right: Box::new(build_node(matrix, right, depth + 1, max_depth, rng)),
    }
}

/// Average unsuccessful-search path length of a binary search tree with n
/// nodes. Normalizes isolation depths across subsample sizes.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Quantile with linear interpolation between closest ranks.
fn empirical_quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

struct FittedForest {
    trees: Vec<IsolationTree>,
    normalizer: f64,
    offset: f64,
}

impl FittedForest {
    /// Raw sample score in [-1, 0): shorter average isolation path means more
    /// anomalous means closer to -1.
    fn sample_score(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.path_length(row)).sum();
        let mean_path = total / self.trees.len() as f64;
        let ratio = if self.normalizer > 0.0 {
            mean_path / self.normalizer
        } else {
            0.0
        };
        -(2f64.powf(-ratio))
    }
}

/// Isolation forest over a normalized feature matrix.
///
/// Outliers separate from the bulk of the data in fewer random splits, so the
/// average isolation depth across many random trees ranks how unusual a row
/// is. Scores follow the decision-function convention: positive for inliers,
/// negative for roughly the `contamination` most unusual fraction of the
/// fitting batch.
pub struct IsolationForest {
    config: ScoringConfig,
    fitted: Option<FittedForest>,
}

impl IsolationForest {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl OutlierModel for IsolationForest {
    fn fit(&mut self, matrix: &[Vec<f64>]) -> eyre::Result<()> {
        if matrix.is_empty() {
            return Err(eyre::eyre!("Cannot fit an isolation forest on an empty batch"));
        }

        let rows = matrix.len();
        let subsample = rows.min(MAX_SUBSAMPLE);
        let max_depth = (subsample.max(2) as f64).log2().ceil() as u32;
        let seed = self.config.seed;

        // Each tree draws from its own seed stream, so parallel construction
        // yields the same forest as a sequential loop would.
        let trees: Vec<IsolationTree> = (0..self.config.trees)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(tree_index as u64));
                let sampled = index::sample(&mut rng, rows, subsample).into_vec();
                IsolationTree::build(matrix, sampled, max_depth, &mut rng)
            })
            .collect();

        let mut forest = FittedForest {
            trees,
            normalizer: average_path_length(subsample),
            offset: 0.0,
        };

        // Zero point of the decision function: the contamination quantile of
        // the fitting batch's own scores.
        let sample_scores: Vec<f64> = matrix
            .par_iter()
            .map(|row| forest.sample_score(row))
            .collect();
        forest.offset = empirical_quantile(&sample_scores, self.config.contamination);

        tracing::debug!(
            rows,
            subsample,
            max_depth,
            trees = self.config.trees,
            offset = forest.offset,
            "Isolation forest fitted"
        );

        self.fitted = Some(forest);
        Ok(())
    }

    fn score_batch(&self, matrix: &[Vec<f64>]) -> eyre::Result<Vec<f64>> {
        let forest = self
            .fitted
            .as_ref()
            .ok_or_else(|| eyre::eyre!("Isolation forest has not been fitted"))?;

        Ok(matrix
            .par_iter()
            .map(|row| forest.sample_score(row) - forest.offset)
            .collect())
    }
}
