use thiserror::Error;

/// Every failure the rating engine can surface.
#[derive(Debug, Error)]
pub enum WhrError {
    #[error("Invalid observation ({competitor} cannot play against itself)")]
    SelfObservation { competitor: String },

    #[error("Invalid match request ({0} cannot be matched against itself)")]
    SelfMatch(String),

    #[error("Unknown outcome code '{0}' (expected H/home or A/away)")]
    UnknownOutcome(String),

    #[error("Invalid time step '{0}'")]
    InvalidTimeStep(String),

    #[error("Malformed record: expected 4 or 5 fields, found {0}")]
    MalformedRecord(usize),

    #[error("Invalid handicap '{0}'")]
    InvalidHandicap(String),

    #[error("Invalid w2 {0} (expected a positive, finite variance)")]
    InvalidW2(f64),

    #[error("Out of order observation for {competitor}: time step {time_step} precedes latest time step {latest}")]
    OutOfOrder {
        competitor: String,
        time_step: i64,
        latest: i64
    },

    #[error("Competitor #{competitor} is not a participant of this observation")]
    NotAParticipant { competitor: usize },

    #[error("Observation is not linked to a rating node for competitor #{competitor}")]
    UnlinkedObservation { competitor: usize },

    #[error("Bad adjusted gamma {gamma} (opponent elo {elo})")]
    AdjustedGammaOutOfRange { gamma: f64, elo: f64 },

    #[error("Unstable rating r = {r} for {competitor}")]
    UnstableRating { competitor: String, r: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize: {0}")]
    Serialization(#[from] serde_json::Error)
}
