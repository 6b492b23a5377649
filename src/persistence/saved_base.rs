use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::WhrError,
    model::{rating_engine::RatingEngine, structures::engine_config::EngineConfig},
    persistence::records::ObservationRecord
};

/// The raw observation list of an engine plus its w2, which is all that is
/// needed to rebuild it. Ratings themselves are not stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SavedBase {
    pub w2: f64,
    pub observations: Vec<ObservationRecord>
}

impl SavedBase {
    pub fn from_engine(engine: &RatingEngine) -> Self {
        let observations = engine
            .observations()
            .iter()
            .filter_map(|observation| {
                let home = engine.competitor_name(observation.competitor_a())?;
                let away = engine.competitor_name(observation.competitor_b())?;

                Some(ObservationRecord {
                    home: home.to_string(),
                    away: away.to_string(),
                    outcome: observation.outcome(),
                    time_step: observation.time_step(),
                    handicap: observation.handicap()
                })
            })
            .collect();

        SavedBase {
            w2: engine.config().w2,
            observations
        }
    }

    /// Engine configuration carrying the saved w2.
    pub fn config(&self) -> EngineConfig {
        EngineConfig::with_w2(self.w2)
    }

    /// Rebuilds an engine with the saved w2 and default settings otherwise.
    pub fn into_engine(self) -> Result<RatingEngine, WhrError> {
        let config = self.config();
        self.restore(config)
    }

    /// Rebuilds an engine by resubmitting every observation. Ratings start
    /// from scratch and need to be iterated again.
    pub fn restore(self, config: EngineConfig) -> Result<RatingEngine, WhrError> {
        let mut engine = RatingEngine::new(config);
        engine.load_records(self.observations)?;

        Ok(engine)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), WhrError> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;

        info!("Saved {} observations to {}", self.observations.len(), path.as_ref().display());
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, WhrError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let base: SavedBase = serde_json::from_reader(reader)?;

        info!("Read {} observations from {}", base.observations.len(), path.as_ref().display());
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            rating_engine::RatingEngine,
            structures::{engine_config::EngineConfig, outcome::Outcome}
        },
        persistence::{records::ObservationRecord, saved_base::SavedBase}
    };

    #[test]
    fn test_from_engine_keeps_submission_order() {
        let mut engine = RatingEngine::new(EngineConfig::with_w2(14.0));
        engine.submit_observation("ohio", "michigan", Outcome::AWins, 1, 0.0).unwrap();
        engine.submit_observation("iowa", "ohio", Outcome::BWins, 2, 3.0).unwrap();

        let base = SavedBase::from_engine(&engine);

        assert_eq!(base.w2, 14.0);
        assert_eq!(
            base.observations,
            vec![
                ObservationRecord::new("ohio", "michigan", Outcome::AWins, 1),
                ObservationRecord {
                    handicap: 3.0,
                    ..ObservationRecord::new("iowa", "ohio", Outcome::BWins, 2)
                },
            ]
        );
    }

    #[test]
    fn test_restore_resubmits_everything() {
        let base = SavedBase {
            w2: 50.0,
            observations: vec![
                ObservationRecord::new("b", "c", Outcome::AWins, 2),
                ObservationRecord::new("a", "b", Outcome::BWins, 1),
            ]
        };

        let engine = base.clone().restore(base.config()).unwrap();

        assert_eq!(engine.config().w2, 50.0);
        assert_eq!(engine.observations().len(), 2);
        // Records were sorted by time step before submission
        assert_eq!(engine.observations()[0].time_step(), 1);
        assert_eq!(engine.competitor("b").unwrap().len(), 2);
    }
}
