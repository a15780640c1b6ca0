/// An unsupervised outlier model scored over a whole batch.
///
/// The contract is two-phase: `fit` learns the batch structure, `score_batch`
/// produces one raw score per row. Higher scores mean the row looks more like
/// the bulk of the batch; outliers score lower. Only the relative ordering is
/// meaningful, the concrete scale is model-specific.
pub trait OutlierModel: Send + Sync {
    /// Fit the model to a feature matrix. Must be called before scoring.
    fn fit(&mut self, matrix: &[Vec<f64>]) -> eyre::Result<()>;

    /// Raw anomaly scores for the given rows, in row order.
    fn score_batch(&self, matrix: &[Vec<f64>]) -> eyre::Result<Vec<f64>>;
}
