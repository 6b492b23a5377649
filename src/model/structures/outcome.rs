use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::EnumIter;

use crate::error::WhrError;

/// Which side of an observation won. Side A is the home side of an
/// imported record, side B the away side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum Outcome {
    AWins,
    BWins
}

impl Outcome {
    /// The two-valued record token for this outcome.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::AWins => "H",
            Outcome::BWins => "A"
        }
    }
}

impl FromStr for Outcome {
    type Err = WhrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "home" => Ok(Outcome::AWins),
            "a" | "away" => Ok(Outcome::BWins),
            _ => Err(WhrError::UnknownOutcome(s.to_string()))
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = WhrError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.code().to_string()
    }
}
