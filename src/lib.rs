pub mod error;
pub mod model;
pub mod persistence;
pub mod utils;

pub use error::WhrError;
pub use model::{rating_engine::RatingEngine, structures::engine_config::EngineConfig};
