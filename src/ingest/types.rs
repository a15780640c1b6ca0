use chrono::{DateTime, Utc};

/// Lending-protocol action categories tracked by the feature aggregator.
/// Tags outside the four known kinds are carried through verbatim so the
/// record set stays complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    LiquidationCall,
    Other(String),
}

impl Action {
    /// Map a raw action tag to its category. Matching is exact; tag spelling
    /// in the source log is lowercase.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "deposit" => Self::Deposit,
            "borrow" => Self::Borrow,
            "repay" => Self::Repay,
            "liquidationcall" => Self::LiquidationCall,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Deposit => "deposit",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
            Self::LiquidationCall => "liquidationcall",
            Self::Other(tag) => tag,
        }
    }
}

/// A normalized lending-protocol transaction, ready for aggregation.
/// Amounts are in token units (raw value divided by 10^decimals).
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub wallet: String,
    pub action: Action,
    pub amount: f64,
    pub tx_hash: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
