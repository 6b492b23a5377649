use crate::{
    error::WhrError,
    model::{
        constants::MAX_ADJUSTED_GAMMA,
        structures::{
            ids::{CompetitorId, NodeRef},
            outcome::Outcome
        }
    }
};

/// Resolves a node reference to that node's current Elo.
pub type EloLookup<'a> = &'a (dyn Fn(NodeRef) -> f64 + Sync);

/// One outcome between two competitors at a time step.
///
/// The node links are filled in when the observation is incorporated by the
/// engine and are never touched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    competitor_a: CompetitorId,
    competitor_b: CompetitorId,
    outcome: Outcome,
    time_step: i64,
    handicap: f64,
    node_a: Option<NodeRef>,
    node_b: Option<NodeRef>
}

impl Observation {
    pub fn new(
        competitor_a: CompetitorId,
        competitor_b: CompetitorId,
        outcome: Outcome,
        time_step: i64,
        handicap: f64
    ) -> Result<Self, WhrError> {
        if competitor_a == competitor_b {
            return Err(WhrError::SelfObservation {
                competitor: format!("#{}", competitor_a.0)
            });
        }

        Ok(Observation {
            competitor_a,
            competitor_b,
            outcome,
            time_step,
            handicap,
            node_a: None,
            node_b: None
        })
    }

    pub fn competitor_a(&self) -> CompetitorId {
        self.competitor_a
    }

    pub fn competitor_b(&self) -> CompetitorId {
        self.competitor_b
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn time_step(&self) -> i64 {
        self.time_step
    }

    pub fn handicap(&self) -> f64 {
        self.handicap
    }

    pub fn winner(&self) -> CompetitorId {
        match self.outcome {
            Outcome::AWins => self.competitor_a,
            Outcome::BWins => self.competitor_b
        }
    }

    pub fn opponent(&self, of: CompetitorId) -> Option<CompetitorId> {
        if of == self.competitor_a {
            Some(self.competitor_b)
        } else if of == self.competitor_b {
            Some(self.competitor_a)
        } else {
            None
        }
    }

    /// The node this observation was filed on for `competitor`, if linked.
    pub fn node_of(&self, competitor: CompetitorId) -> Option<NodeRef> {
        if competitor == self.competitor_a {
            self.node_a
        } else if competitor == self.competitor_b {
            self.node_b
        } else {
            None
        }
    }

    pub fn is_linked(&self) -> bool {
        self.node_a.is_some() && self.node_b.is_some()
    }

    pub(crate) fn attach(&mut self, node: NodeRef) {
        if node.competitor == self.competitor_a {
            self.node_a = Some(node);
        } else if node.competitor == self.competitor_b {
            self.node_b = Some(node);
        }
    }

    /// Strength of `of`'s opponent as a Bradley-Terry gamma, with the handicap
    /// applied from `of`'s point of view.
    pub fn opponents_adjusted_gamma(&self, of: CompetitorId, elo_of: EloLookup) -> Result<f64, WhrError> {
        let (opponent, opponent_node, offset) = if of == self.competitor_a {
            (self.competitor_b, self.node_b, -self.handicap)
        } else if of == self.competitor_b {
            (self.competitor_a, self.node_a, self.handicap)
        } else {
            return Err(WhrError::NotAParticipant { competitor: of.0 });
        };

        let node = opponent_node.ok_or(WhrError::UnlinkedObservation { competitor: opponent.0 })?;
        let elo = elo_of(node) + offset;
        let gamma = 10f64.powf(elo / 400.0);

        if gamma == 0.0 || !gamma.is_finite() || gamma > MAX_ADJUSTED_GAMMA {
            return Err(WhrError::AdjustedGammaOutOfRange { gamma, elo });
        }

        Ok(gamma)
    }

    pub fn win_probability(&self, of: CompetitorId, elo_of: EloLookup) -> Result<f64, WhrError> {
        let own_node = self
            .node_of(of)
            .ok_or(WhrError::UnlinkedObservation { competitor: of.0 })?;
        let own_gamma = 10f64.powf(elo_of(own_node) / 400.0);
        let opponent_gamma = self.opponents_adjusted_gamma(of, elo_of)?;

        Ok(own_gamma / (own_gamma + opponent_gamma))
    }

    /// 1.0 if the favourite won, 0.0 if it lost, 0.5 when neither side was favoured.
    pub fn prediction_score(&self, elo_of: EloLookup) -> Result<f64, WhrError> {
        let b_probability = self.win_probability(self.competitor_b, elo_of)?;

        if b_probability == 0.5 {
            return Ok(0.5);
        }

        let favourite_won = match self.outcome {
            Outcome::BWins => b_probability > 0.5,
            Outcome::AWins => b_probability < 0.5
        };

        Ok(if favourite_won { 1.0 } else { 0.0 })
    }
}
