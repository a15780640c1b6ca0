pub mod anomaly;
pub mod config;
pub mod features;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod score;

pub use config::Config;
pub use pipeline::RunSummary;
