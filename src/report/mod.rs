pub mod histogram;
pub mod scores_csv;
pub mod summary;
