use serde::{Deserialize, Serialize};

use crate::{error::WhrError, model::structures::outcome::Outcome};

/// A raw observation as exchanged with upstream collaborators:
/// `home, away, winner code, time step[, handicap]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub home: String,
    pub away: String,
    #[serde(rename = "winner")]
    pub outcome: Outcome,
    pub time_step: i64,
    #[serde(default)]
    pub handicap: f64
}

impl ObservationRecord {
    pub fn new(home: &str, away: &str, outcome: Outcome, time_step: i64) -> Self {
        ObservationRecord {
            home: home.to_string(),
            away: away.to_string(),
            outcome,
            time_step,
            handicap: 0.0
        }
    }

    /// Parses a 4 or 5 field row. Unknown winner codes and non-integer time
    /// steps are rejected here, before anything reaches the engine.
    pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Result<Self, WhrError> {
        if row.len() != 4 && row.len() != 5 {
            return Err(WhrError::MalformedRecord(row.len()));
        }

        let outcome = row[2].as_ref().parse::<Outcome>()?;
        let time_step = row[3]
            .as_ref()
            .trim()
            .parse::<i64>()
            .map_err(|_| WhrError::InvalidTimeStep(row[3].as_ref().to_string()))?;
        let handicap = match row.get(4) {
            Some(h) => h
                .as_ref()
                .trim()
                .parse::<f64>()
                .map_err(|_| WhrError::InvalidHandicap(h.as_ref().to_string()))?,
            None => 0.0
        };

        Ok(ObservationRecord {
            home: row[0].as_ref().to_string(),
            away: row[1].as_ref().to_string(),
            outcome,
            time_step,
            handicap
        })
    }
}

/// Stable sort by time step, so records of one time step keep their order.
pub fn sort_chronologically(records: &mut [ObservationRecord]) {
    records.sort_by_key(|record| record.time_step);
}
