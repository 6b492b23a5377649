use serde::{Deserialize, Serialize};

/// A competitor with either its latest Elo or its whole Elo history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompetitorRating {
    pub name: String,
    pub elo: Vec<f64>
}

/// One node of a competitor's rating history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeStepRating {
    pub time_step: i64,
    pub elo: f64,
    /// Posterior variance of r, `None` until uncertainty has been computed
    pub uncertainty: Option<f64>
}
