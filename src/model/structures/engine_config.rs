use serde::{Deserialize, Serialize};
use std::f64::consts::LN_10;

use crate::{
    error::WhrError,
    model::{constants::DEFAULT_W2, structures::update_schedule::UpdateSchedule}
};

/// Configuration of a [`RatingEngine`](crate::model::rating_engine::RatingEngine)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Random walk variance per time step, in Elo²
    pub w2: f64,
    /// Log per-iteration diagnostics
    pub debug: bool,
    pub schedule: UpdateSchedule
}

impl EngineConfig {
    pub fn with_w2(w2: f64) -> Self {
        Self { w2, ..Self::default() }
    }

    /// w2 must be a positive finite variance.
    pub fn validate(&self) -> Result<(), WhrError> {
        if self.w2.is_finite() && self.w2 > 0.0 {
            Ok(())
        } else {
            Err(WhrError::InvalidW2(self.w2))
        }
    }

    /// w2 converted from Elo² to r² units
    pub fn prior_variance(&self) -> f64 {
        (self.w2.sqrt() * LN_10 / 400.0).powi(2)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            w2: DEFAULT_W2,
            debug: false,
            schedule: UpdateSchedule::Sequential
        }
    }
}
