use crate::score::ScoredWallet;

/// Write the final `wallet,credit_score` table.
pub fn write_scores(path: &str, scored: &[ScoredWallet]) -> eyre::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| eyre::eyre!("Failed to create scores file '{}': {}", path, e))?;

    writer.write_record(["wallet", "credit_score"])?;
    for wallet in scored {
        let score = wallet.credit_score.to_string();
        writer.write_record([wallet.features.wallet.as_str(), score.as_str()])?;
    }
    writer.flush()?;

    tracing::info!(wallets = scored.len(), path, "Wallet scores written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extractor::WalletFeatures;

    fn scored(name: &str, credit_score: u32) -> ScoredWallet {
        ScoredWallet {
            features: WalletFeatures {
                wallet: name.to_string(),
                deposit_count: 0,
                borrow_count: 0,
                repay_count: 0,
                liquidation_count: 0,
                deposit_amount: 0.0,
                borrow_amount: 0.0,
                borrow_deposit_ratio: 1.0,
            },
            anomaly_score: 0.0,
            credit_score,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let path = path.to_str().unwrap();

        let wallets = vec![scored("0xaaa", 0), scored("0xbbb", 500), scored("0xccc", 1000)];
        write_scores(path, &wallets).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "wallet,credit_score\n0xaaa,0\n0xbbb,500\n0xccc,1000\n");
    }

    #[test]
    fn test_empty_batch_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let path = path.to_str().unwrap();

        write_scores(path, &[]).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "wallet,credit_score\n");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let result = write_scores("/nonexistent/dir/scores.csv", &[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scores.csv"));
    }
}
