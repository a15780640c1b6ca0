use std::collections::BTreeMap;

use crate::ingest::types::{Action, TransactionRecord};

/// Number of numeric columns fed to the scoring model.
pub const FEATURE_COLUMNS: usize = 7;

/// Per-wallet behavioral profile derived from the transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletFeatures {
    pub wallet: String,
    pub deposit_count: u32,
    pub borrow_count: u32,
    pub repay_count: u32,
    pub liquidation_count: u32,
    pub deposit_amount: f64,
    pub borrow_amount: f64,
    pub borrow_deposit_ratio: f64,
}

impl WalletFeatures {
    /// The numeric columns in model order, wallet id excluded.
    pub fn numeric_row(&self) -> [f64; FEATURE_COLUMNS] {
        [
            self.deposit_count as f64,
            self.borrow_count as f64,
            self.repay_count as f64,
            self.liquidation_count as f64,
            self.deposit_amount,
            self.borrow_amount,
            self.borrow_deposit_ratio,
        ]
    }
}

/// Group records by wallet id and derive one feature vector per wallet.
///
/// Grouping is exact string match on the wallet id; distinct spellings stay
/// distinct wallets. Rows come out in ascending wallet order, which fixes the
/// row order of everything downstream.
pub fn extract_features(records: &[TransactionRecord]) -> Vec<WalletFeatures> {
    let mut groups: BTreeMap<&str, Vec<&TransactionRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.wallet.as_str()).or_default().push(record);
    }

    let mut features = Vec::with_capacity(groups.len());
    for (wallet, group) in groups {
        let mut deposit_count = 0u32;
        let mut borrow_count = 0u32;
        let mut repay_count = 0u32;
        let mut liquidation_count = 0u32;
        let mut deposit_amount = 0f64;
        let mut borrow_amount = 0f64;

        for record in group {
            match record.action {
                Action::Deposit => {
                    deposit_count += 1;
                    deposit_amount += record.amount;
                }
                Action::Borrow => {
                    borrow_count += 1;
                    borrow_amount += record.amount;
                }
                Action::Repay => repay_count += 1,
                Action::LiquidationCall => liquidation_count += 1,
                Action::Other(_) => {}
            }
        }

        // A wallet that never deposited gets a flat ratio of 1.0 instead of a
        // division by zero, whatever its borrow count.
        let borrow_deposit_ratio = if deposit_count > 0 {
            borrow_count as f64 / deposit_count as f64
        } else {
            1.0
        };

        features.push(WalletFeatures {
            wallet: wallet.to_string(),
            deposit_count,
            borrow_count,
            repay_count,
            liquidation_count,
            deposit_amount,
            borrow_amount,
            borrow_deposit_ratio,
        });
    }

    tracing::info!(wallets = features.len(), "Wallet features extracted");
    features
}
