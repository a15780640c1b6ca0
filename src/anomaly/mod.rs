pub mod forest;
pub mod model;
pub mod scaler;
