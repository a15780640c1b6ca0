use crate::anomaly::model::OutlierModel;
use crate::anomaly::scaler::{sanitize, MinMaxScaler};
use crate::features::extractor::WalletFeatures;

/// Credit score assigned to every wallet when the batch is degenerate.
pub const MIDPOINT_SCORE: u32 = 500;

/// Upper end of the credit score range.
pub const MAX_SCORE: u32 = 1000;

/// A wallet with its raw model output and final credit score.
#[derive(Debug, Clone)]
pub struct ScoredWallet {
    pub features: WalletFeatures,
    pub anomaly_score: f64,
    pub credit_score: u32,
}

/// Score a feature batch: sanitize, scale to the unit range, fit the outlier
/// model, then rescale its raw scores onto [0, 1000].
///
/// The model scores "more like the bulk of the batch" higher, and higher maps
/// to better credit. Scores therefore rank wallets within a batch rather than
/// grade them on an absolute scale.
pub fn score_wallets(
    features: Vec<WalletFeatures>,
    model: &mut dyn OutlierModel,
) -> eyre::Result<Vec<ScoredWallet>> {
    if features.is_empty() {
        return Err(eyre::eyre!("Transaction log contains no wallets to score"));
    }

    let mut matrix: Vec<Vec<f64>> = features.iter().map(|f| f.numeric_row().to_vec()).collect();
    sanitize(&mut matrix);

    let scaler = MinMaxScaler::fit(&matrix);
    let scaled = scaler.transform(&matrix);

    model.fit(&scaled)?;
    let raw_scores = model.score_batch(&scaled)?;
    tracing::debug!(wallets = raw_scores.len(), "Raw anomaly scores computed");

    let credit_scores = rescale_scores(&raw_scores);

    let scored: Vec<ScoredWallet> = features
        .into_iter()
        .zip(raw_scores)
        .zip(credit_scores)
        .map(|((features, anomaly_score), credit_score)| ScoredWallet {
            features,
            anomaly_score,
            credit_score,
        })
        .collect();

    tracing::info!(wallets = scored.len(), "Wallets scored");
    Ok(scored)
}

/// Linear rescale from [batch_min, batch_max] onto integer [0, 1000]. A batch
/// with a single distinct raw score collapses to the midpoint for every
/// wallet instead of dividing by zero.
fn rescale_scores(raw: &[f64]) -> Vec<u32> {
    let batch_min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let batch_max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = batch_max - batch_min;

    if range == 0.0 {
        tracing::warn!(
            wallets = raw.len(),
            "Degenerate score batch, assigning the midpoint score to every wallet"
        );
        return vec![MIDPOINT_SCORE; raw.len()];
    }

    raw.iter()
        .map(|&score| (((score - batch_min) / range) * MAX_SCORE as f64).floor() as u32)
        .collect()
}
