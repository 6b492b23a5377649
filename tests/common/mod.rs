use std::{path::PathBuf, sync::Once};

use whr_processor::model::{rating_engine::RatingEngine, structures::engine_config::EngineConfig};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn engine() -> RatingEngine {
    init_test_env();
    RatingEngine::new(EngineConfig::default())
}

/// A path in the system temp directory unique to this process and `name`.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("whr-processor-{}-{}.json", std::process::id(), name))
}

pub fn latest_elo(engine: &RatingEngine, name: &str) -> f64 {
    engine.competitor(name).unwrap().latest().unwrap().elo()
}
