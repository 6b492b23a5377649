use tracing::warn;

use crate::{
    error::WhrError,
    model::{
        constants::ELO_PER_R,
        observation::{EloLookup, Observation},
        structures::ids::{CompetitorId, ObservationId}
    }
};

/// One factor `(a·gamma + b) / (c·gamma + d)` of a node's likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodTerm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64
}

impl LikelihoodTerm {
    pub fn won(opponent_gamma: f64) -> Self {
        LikelihoodTerm {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: opponent_gamma
        }
    }

    pub fn lost(opponent_gamma: f64) -> Self {
        LikelihoodTerm {
            a: 0.0,
            b: opponent_gamma,
            c: 1.0,
            d: opponent_gamma
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikelihoodTerms {
    pub won: Vec<LikelihoodTerm>,
    pub lost: Vec<LikelihoodTerm>
}

impl LikelihoodTerms {
    fn clear(&mut self) {
        self.won.clear();
        self.lost.clear();
    }

    fn all(&self) -> impl Iterator<Item = &LikelihoodTerm> {
        self.won.iter().chain(self.lost.iter())
    }

    pub fn log_likelihood(&self, gamma: f64) -> f64 {
        let won: f64 = self
            .won
            .iter()
            .map(|t| (t.a * gamma).ln() - (t.c * gamma + t.d).ln())
            .sum();
        let lost: f64 = self.lost.iter().map(|t| t.b.ln() - (t.c * gamma + t.d).ln()).sum();

        won + lost
    }

    pub fn first_derivative(&self, gamma: f64) -> f64 {
        let tally: f64 = self.all().map(|t| t.c / (t.c * gamma + t.d)).sum();

        self.won.len() as f64 - gamma * tally
    }

    pub fn second_derivative(&self, gamma: f64) -> f64 {
        let tally: f64 = self.all().map(|t| (t.c * t.d) / (t.c * gamma + t.d).powi(2)).sum();

        -gamma * tally
    }
}

/// Memoized likelihood terms. `dirty` is raised once per iteration and the
/// terms are rebuilt on the next read, reusing the previous allocation.
#[derive(Debug, Clone)]
struct TermCache {
    dirty: bool,
    terms: Option<LikelihoodTerms>
}

impl Default for TermCache {
    fn default() -> Self {
        TermCache { dirty: true, terms: None }
    }
}

/// A competitor's strength at one time step.
#[derive(Debug, Clone)]
pub struct RatingNode {
    time_step: i64,
    r: f64,
    is_first_week: bool,
    won: Vec<ObservationId>,
    lost: Vec<ObservationId>,
    uncertainty: Option<f64>,
    cache: TermCache
}

impl RatingNode {
    pub fn new(time_step: i64, gamma: f64, is_first_week: bool) -> Self {
        RatingNode {
            time_step,
            r: gamma.ln(),
            is_first_week,
            won: Vec::new(),
            lost: Vec::new(),
            uncertainty: None,
            cache: TermCache::default()
        }
    }

    pub fn time_step(&self) -> i64 {
        self.time_step
    }

    pub fn is_first_week(&self) -> bool {
        self.is_first_week
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn set_r(&mut self, r: f64) {
        self.r = r;
    }

    pub fn gamma(&self) -> f64 {
        self.r.exp()
    }

    pub fn set_gamma(&mut self, gamma: f64) {
        self.r = gamma.ln();
    }

    pub fn elo(&self) -> f64 {
        self.r * ELO_PER_R
    }

    pub fn set_elo(&mut self, elo: f64) {
        self.r = elo / ELO_PER_R;
    }

    pub fn uncertainty(&self) -> Option<f64> {
        self.uncertainty
    }

    pub(crate) fn set_uncertainty(&mut self, variance: f64) {
        self.uncertainty = Some(variance);
    }

    pub fn won(&self) -> &[ObservationId] {
        &self.won
    }

    pub fn lost(&self) -> &[ObservationId] {
        &self.lost
    }

    /// Files the observation as a win or a loss for `own`.
    pub fn record_result(&mut self, id: ObservationId, observation: &Observation, own: CompetitorId) {
        if observation.winner() == own {
            self.won.push(id);
        } else {
            self.lost.push(id);
        }
        self.cache.dirty = true;
    }

    pub fn invalidate_terms(&mut self) {
        self.cache.dirty = true;
    }

    /// Returns the memoized terms, rebuilding them first if they were invalidated.
    pub fn terms(
        &mut self,
        own: CompetitorId,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<&LikelihoodTerms, WhrError> {
        if self.cache.dirty || self.cache.terms.is_none() {
            self.rebuild_terms(own, observations, elo_of)?;
        }

        Ok(self.cache.terms.get_or_insert_with(LikelihoodTerms::default))
    }

    fn rebuild_terms(
        &mut self,
        own: CompetitorId,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<(), WhrError> {
        let mut terms = self.cache.terms.take().unwrap_or_default();
        terms.clear();

        for id in &self.won {
            if let Some(gamma) = Self::opponent_gamma(&observations[id.0], own, elo_of)? {
                terms.won.push(LikelihoodTerm::won(gamma));
            }
        }
        for id in &self.lost {
            if let Some(gamma) = Self::opponent_gamma(&observations[id.0], own, elo_of)? {
                terms.lost.push(LikelihoodTerm::lost(gamma));
            }
        }

        if self.is_first_week {
            // One win and one loss against a virtual opponent with gamma = 1
            terms.won.push(LikelihoodTerm::won(1.0));
            terms.lost.push(LikelihoodTerm::lost(1.0));
        }

        self.cache.terms = Some(terms);
        self.cache.dirty = false;
        Ok(())
    }

    fn opponent_gamma(observation: &Observation, own: CompetitorId, elo_of: EloLookup) -> Result<Option<f64>, WhrError> {
        match observation.opponents_adjusted_gamma(own, elo_of) {
            Ok(gamma) => Ok(Some(gamma)),
            Err(WhrError::UnlinkedObservation { competitor }) => {
                warn!(
                    "Skipping observation at time step {}: opponent #{} was never linked",
                    observation.time_step(),
                    competitor
                );
                Ok(None)
            }
            Err(e) => Err(e)
        }
    }

    pub fn log_likelihood(
        &mut self,
        own: CompetitorId,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<f64, WhrError> {
        let gamma = self.gamma();
        Ok(self.terms(own, observations, elo_of)?.log_likelihood(gamma))
    }

    /// First and second derivative of the log-likelihood with respect to r.
    pub fn derivatives(
        &mut self,
        own: CompetitorId,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<(f64, f64), WhrError> {
        let gamma = self.gamma();
        let terms = self.terms(own, observations, elo_of)?;

        Ok((terms.first_derivative(gamma), terms.second_derivative(gamma)))
    }

    /// One-dimensional Newton step, used when the chain has a single node.
    /// Returns the proposed r without applying it.
    pub fn newton_step(
        &mut self,
        own: CompetitorId,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<f64, WhrError> {
        let (first, second) = self.derivatives(own, observations, elo_of)?;

        Ok(self.r - first / second)
    }
}
