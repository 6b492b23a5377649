use std::f64::consts::LN_10;

// Model constants
pub const DEFAULT_W2: f64 = 300.0;
pub const HESSIAN_DAMPING: f64 = 0.001;
pub const MAX_ABS_R: f64 = 650.0;
pub const MAX_ADJUSTED_GAMMA: f64 = i64::MAX as f64;
pub const ELO_PER_R: f64 = 400.0 / LN_10;
// Iteration control
pub const BATCH_ITERATIONS: usize = 10;
pub const DEFAULT_PRECISION: f64 = 10e-3;
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 10;
