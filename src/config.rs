use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            transactions_file: default_transactions_file(),
            token_decimals: default_token_decimals(),
        }
    }
}

fn default_transactions_file() -> String {
    "user-wallet-transactions.json".to_string()
}

fn default_token_decimals() -> u32 {
    6
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_trees")]
    pub trees: u32,
    #[serde(default = "default_contamination")]
    pub contamination: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trees: default_trees(),
            contamination: default_contamination(),
            seed: default_seed(),
        }
    }
}

fn default_trees() -> u32 {
    100
}

fn default_contamination() -> f64 {
    0.05
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_scores_file")]
    pub scores_file: String,
    #[serde(default = "default_histogram_file")]
    pub histogram_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scores_file: default_scores_file(),
            histogram_file: default_histogram_file(),
        }
    }
}

fn default_scores_file() -> String {
    "wallet_scores.csv".to_string()
}

fn default_histogram_file() -> String {
    "score_distribution.png".to_string()
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.input.transactions_file.is_empty() {
            return Err(eyre::eyre!("Transactions file path must not be empty"));
        }
        if self.input.token_decimals > 18 {
            return Err(eyre::eyre!(
                "Token decimals {} is out of range (max 18)",
                self.input.token_decimals
            ));
        }
        if self.scoring.trees == 0 {
            return Err(eyre::eyre!("Scoring must use at least one tree"));
        }
        if !(self.scoring.contamination > 0.0 && self.scoring.contamination <= 0.5) {
            return Err(eyre::eyre!(
                "Contamination {} is out of range (must be in (0, 0.5])",
                self.scoring.contamination
            ));
        }
        if self.output.scores_file.is_empty() {
            return Err(eyre::eyre!("Scores file path must not be empty"));
        }
        if self.output.histogram_file.is_empty() {
            return Err(eyre::eyre!("Histogram file path must not be empty"));
        }
        Ok(())
    }
}
