/// Distribution summary of the final credit scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: u32,
}

impl ScoreSummary {
    /// Compute the summary over a score batch. None for an empty batch.
    /// Standard deviation is the sample estimate (n - 1 denominator), zero
    /// for a single score. Percentiles interpolate linearly between ranks.
    pub fn compute(scores: &[u32]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let mut sorted = scores.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / count as f64;

        let std_dev = if count > 1 {
            let variance = sorted
                .iter()
                .map(|&s| {
                    let delta = s as f64 - mean;
                    delta * delta
                })
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            mean,
            std_dev,
            min: sorted[0],
            q25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q75: percentile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

fn percentile(sorted: &[u32], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] as f64 + (sorted[upper] as f64 - sorted[lower] as f64) * fraction
}
