use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::WhrError, model::rating_engine::RatingEngine};

/// Competitor display name → metric name → rounded latest Elo.
///
/// Several engines (one per outcome category) can record into the same report.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RatingReport {
    competitors: BTreeMap<String, BTreeMap<String, i64>>
}

impl RatingReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every rated competitor's latest Elo under `metric`.
    pub fn record_metric(&mut self, metric: &str, engine: &RatingEngine) {
        for rating in engine.ordered_ratings(true) {
            if let Some(elo) = rating.elo.last() {
                self.competitors
                    .entry(rating.name)
                    .or_default()
                    .insert(metric.to_string(), elo.round() as i64);
            }
        }
    }

    pub fn get(&self, competitor: &str, metric: &str) -> Option<i64> {
        self.competitors.get(competitor)?.get(metric).copied()
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn to_json(&self) -> Result<String, WhrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), WhrError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
