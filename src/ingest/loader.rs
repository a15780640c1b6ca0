use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::types::{Action, TransactionRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    user_wallet: String,
    action: String,
    #[serde(default)]
    action_data: JsonValue,
    #[serde(default)]
    tx_hash: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Load the transaction log from a JSON file and normalize every record.
///
/// The root must be an array of transaction objects; each object must carry a
/// non-empty wallet id and an action tag. A missing or malformed amount
/// defaults to 0 rather than failing the run.
pub fn load_transactions(path: &str, token_decimals: u32) -> eyre::Result<Vec<TransactionRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("Failed to read transactions file '{}': {}", path, e))?;

    let raw: Vec<JsonValue> = serde_json::from_str(&content)
        .map_err(|e| eyre::eyre!("Failed to parse transactions JSON '{}': {}", path, e))?;

    let divisor = 10f64.powi(token_decimals as i32);
    let mut records = Vec::with_capacity(raw.len());
    let mut defaulted_amounts = 0usize;

    for (index, value) in raw.into_iter().enumerate() {
        let tx: RawTransaction = serde_json::from_value(value)
            .map_err(|e| eyre::eyre!("Malformed transaction record at index {}: {}", index, e))?;

        if tx.user_wallet.is_empty() {
            return Err(eyre::eyre!(
                "Transaction record at index {} has an empty wallet id{}",
                index,
                tx.tx_hash
                    .as_deref()
                    .map(|h| format!(" (tx {})", h))
                    .unwrap_or_default()
            ));
        }

        let action = Action::parse(&tx.action);
        let amount = match extract_amount(&tx.action_data) {
            Some(raw_amount) => raw_amount / divisor,
            None => {
                tracing::debug!(
                    wallet = %tx.user_wallet,
                    action = action.as_str(),
                    "Missing or malformed amount, defaulting to 0"
                );
                defaulted_amounts += 1;
                0.0
            }
        };

        records.push(TransactionRecord {
            wallet: tx.user_wallet,
            action,
            amount,
            tx_hash: tx.tx_hash,
            timestamp: tx.timestamp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        });
    }

    if defaulted_amounts > 0 {
        tracing::warn!(
            count = defaulted_amounts,
            "Records with missing or malformed amounts defaulted to 0"
        );
    }

    if let Some((first, last)) = observation_window(&records) {
        tracing::info!(from = %first, to = %last, "Observation window");
    }

    tracing::info!(count = records.len(), path, "Transactions loaded");
    Ok(records)
}

/// Pull the raw amount out of the action payload. The source log stores it as
/// either a JSON number or a decimal string.
fn extract_amount(action_data: &JsonValue) -> Option<f64> {
    match action_data.get("amount") {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn observation_window(records: &[TransactionRecord]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut stamps = records.iter().filter_map(|r| r.timestamp);
    let first = stamps.next()?;
    let (earliest, latest) = stamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
    Some((earliest, latest))
}
