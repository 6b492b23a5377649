use std::time::{Duration, Instant};

use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    error::WhrError,
    model::{
        competitor_chain::CompetitorChain,
        constants::BATCH_ITERATIONS,
        observation::{EloLookup, Observation},
        rating_node::RatingNode,
        structures::{
            engine_config::EngineConfig,
            ids::{CompetitorId, NodeRef, ObservationId},
            outcome::Outcome,
            ratings::{CompetitorRating, TimeStepRating},
            update_schedule::UpdateSchedule
        }
    },
    persistence::records::{sort_chronologically, ObservationRecord}
};

/// # Whole-History Rating engine
///
/// Owns every competitor chain (in first-reference order) and every
/// observation (in submission order).
///
/// Steps:
/// 1. Observations are submitted. Each one is filed on the node of both
///     competitors for its time step, creating chains and nodes as needed.
/// 2. Each iteration runs one Newton-Raphson update per chain. How a chain sees
///     its opponents during a pass depends on the [`UpdateSchedule`].
/// 3. After a batch of iterations the posterior variance of every node is
///     recomputed.
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: EngineConfig,
    chains: IndexMap<String, CompetitorChain>,
    observations: Vec<Observation>
}

impl RatingEngine {
    pub fn new(config: EngineConfig) -> Self {
        RatingEngine {
            config,
            chains: IndexMap::new(),
            observations: Vec::new()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn competitors(&self) -> impl Iterator<Item = &CompetitorChain> {
        self.chains.values()
    }

    pub fn competitor(&self, name: &str) -> Option<&CompetitorChain> {
        self.chains.get(name)
    }

    pub fn competitor_name(&self, id: CompetitorId) -> Option<&str> {
        self.chains.get_index(id.0).map(|(name, _)| name.as_str())
    }

    /// Returns the chain for `name`, registering it if this is the first reference.
    pub fn team_by_name(&mut self, name: &str) -> &CompetitorChain {
        let id = self.resolve(name);
        &self.chains[id.0]
    }

    fn resolve(&mut self, name: &str) -> CompetitorId {
        if let Some(index) = self.chains.get_index_of(name) {
            return CompetitorId(index);
        }

        let id = CompetitorId(self.chains.len());
        self.chains.insert(name.to_string(), CompetitorChain::new(id, name));
        id
    }

    /// Incorporates one observation between `a` and `b`.
    ///
    /// Chains only grow forward in time: a time step before either
    /// competitor's latest node is rejected before anything is filed.
    pub fn submit_observation(
        &mut self,
        a: &str,
        b: &str,
        outcome: Outcome,
        time_step: i64,
        handicap: f64
    ) -> Result<ObservationId, WhrError> {
        if a == b {
            return Err(WhrError::SelfObservation {
                competitor: a.to_string()
            });
        }

        for name in [a, b] {
            if let Some(chain) = self.chains.get(name) {
                chain.check_time_step(time_step)?;
            }
        }

        let id_a = self.resolve(a);
        let id_b = self.resolve(b);

        let mut observation = Observation::new(id_a, id_b, outcome, time_step, handicap)?;
        let id = ObservationId(self.observations.len());

        let node_a = self.chains[id_a.0].record_result_at(id, &observation);
        let node_b = self.chains[id_b.0].record_result_at(id, &observation);
        observation.attach(node_a);
        observation.attach(node_b);

        if !observation.is_linked() {
            warn!("Bad observation: {} vs {} at time step {} is missing a node link", a, b, time_step);
        }

        self.observations.push(observation);
        Ok(id)
    }

    pub fn submit_record(&mut self, record: &ObservationRecord) -> Result<ObservationId, WhrError> {
        self.submit_observation(
            &record.home,
            &record.away,
            record.outcome,
            record.time_step,
            record.handicap
        )
    }

    /// Loads records in any order. They are submitted sorted by time step.
    pub fn load_records(&mut self, mut records: Vec<ObservationRecord>) -> Result<usize, WhrError> {
        sort_chronologically(&mut records);

        for record in &records {
            self.submit_record(record)?;
        }

        info!("Loaded {} observations", records.len());
        Ok(records.len())
    }

    /// Runs `f` on one chain while the rest of the registry stays readable.
    /// The chain is moved out for the duration, which is sound because an
    /// observation never pairs a competitor with itself.
    fn with_detached_chain<F>(&mut self, index: usize, f: F) -> Result<(), WhrError>
    where
        F: FnOnce(&mut CompetitorChain, &[Observation], EloLookup<'_>) -> Result<(), WhrError>
    {
        let mut chain = std::mem::take(&mut self.chains[index]);

        let chains = &self.chains;
        let elo_of = |node: NodeRef| chains[node.competitor.0].nodes()[node.index].elo();
        let result = f(&mut chain, &self.observations, &elo_of);

        self.chains[index] = chain;
        result
    }

    fn prior_variance(&self) -> Result<f64, WhrError> {
        self.config.validate()?;
        Ok(self.config.prior_variance())
    }

    /// One Newton-Raphson update on every chain.
    pub fn run_iteration(&mut self) -> Result<(), WhrError> {
        let w2 = self.prior_variance()?;

        match self.config.schedule {
            UpdateSchedule::Sequential => {
                for index in 0..self.chains.len() {
                    self.with_detached_chain(index, |chain, observations, elo_of| {
                        chain.run_newton_iteration(w2, observations, elo_of)
                    })?;
                }
            }
            UpdateSchedule::Simultaneous => {
                let snapshot: Vec<Vec<f64>> = self
                    .chains
                    .values()
                    .map(|chain| chain.nodes().iter().map(RatingNode::elo).collect())
                    .collect();
                let elo_of = |node: NodeRef| snapshot[node.competitor.0][node.index];
                let observations = &self.observations;

                self.chains
                    .par_values_mut()
                    .try_for_each(|chain| chain.run_newton_iteration(w2, observations, &elo_of))?;
            }
        }

        if self.config.debug {
            debug!("Iteration complete, log likelihood = {}", self.log_likelihood()?);
        }

        Ok(())
    }

    /// Runs `count` iterations, then recomputes every node's uncertainty.
    pub fn iterate(&mut self, count: usize) -> Result<(), WhrError> {
        for _ in 0..count {
            self.run_iteration()?;
        }

        self.update_uncertainty()
    }

    fn update_uncertainty(&mut self) -> Result<(), WhrError> {
        let w2 = self.prior_variance()?;

        for index in 0..self.chains.len() {
            self.with_detached_chain(index, |chain, observations, elo_of| {
                chain.update_uncertainty(w2, observations, elo_of)
            })?;
        }

        Ok(())
    }

    /// Iterates in batches until two consecutive batches agree within
    /// `precision` Elo, or until `time_limit` has passed.
    ///
    /// At least one batch always runs and a batch is never interrupted; the
    /// time limit is only checked between batches. Returns the number of
    /// iterations run and whether the ratings converged.
    pub fn auto_iterate(&mut self, time_limit: Duration, precision: f64) -> Result<(usize, bool), WhrError> {
        let start = Instant::now();
        let mut iterations = 0;
        let mut previous: Option<Vec<f64>> = None;

        loop {
            self.iterate(BATCH_ITERATIONS)?;
            iterations += BATCH_ITERATIONS;

            let current = self.rating_snapshot();
            if let Some(previous) = &previous {
                if Self::is_stable(previous, &current, precision) {
                    info!("Ratings converged after {} iterations", iterations);
                    return Ok((iterations, true));
                }
            }

            if start.elapsed() >= time_limit {
                info!(
                    "Time limit of {:?} reached after {} iterations without convergence",
                    time_limit, iterations
                );
                return Ok((iterations, false));
            }

            debug!("Batch complete, {} iterations so far", iterations);
            previous = Some(current);
        }
    }

    /// Every node's Elo, flattened in registry order.
    fn rating_snapshot(&self) -> Vec<f64> {
        self.chains
            .values()
            .flat_map(|chain| chain.nodes().iter().map(RatingNode::elo))
            .collect()
    }

    fn is_stable(previous: &[f64], current: &[f64], precision: f64) -> bool {
        previous.iter().zip(current).all(|(x1, x2)| (x2 - x1).abs() <= precision)
    }

    /// Competitors with at least one node, ascending by their latest strength.
    /// With `current` only the latest Elo is reported, otherwise the full history.
    pub fn ordered_ratings(&self, current: bool) -> Vec<CompetitorRating> {
        self.chains
            .values()
            .filter_map(|chain| chain.latest().map(|latest| (chain, latest.gamma())))
            .sorted_by(|(_, g1), (_, g2)| g1.total_cmp(g2))
            .map(|(chain, _)| CompetitorRating {
                name: chain.name().to_string(),
                elo: if current {
                    chain.latest().map(RatingNode::elo).into_iter().collect()
                } else {
                    chain.nodes().iter().map(RatingNode::elo).collect()
                }
            })
            .collect_vec()
    }

    /// Per time step Elo and uncertainty for one competitor.
    pub fn ratings_for_competitor(&self, name: &str) -> Option<Vec<TimeStepRating>> {
        let chain = self.chains.get(name)?;

        Some(
            chain
                .nodes()
                .iter()
                .map(|node| TimeStepRating {
                    time_step: node.time_step(),
                    elo: node.elo(),
                    uncertainty: node.uncertainty()
                })
                .collect()
        )
    }

    /// Win probabilities of a hypothetical match between `name1` and `name2`
    /// from their latest ratings. Unknown competitors count as gamma = 1.
    pub fn probability_of_future_match(&self, name1: &str, name2: &str) -> Result<(f64, f64), WhrError> {
        if name1 == name2 {
            return Err(WhrError::SelfMatch(name1.to_string()));
        }

        let gamma = |name: &str| {
            self.chains
                .get(name)
                .and_then(CompetitorChain::latest)
                .map_or(1.0, RatingNode::gamma)
        };
        let (gamma1, gamma2) = (gamma(name1), gamma(name2));

        Ok((gamma1 / (gamma1 + gamma2), gamma2 / (gamma1 + gamma2)))
    }

    /// Sum of every chain's log-posterior. Only useful as a diagnostic.
    pub fn log_likelihood(&mut self) -> Result<f64, WhrError> {
        let w2 = self.prior_variance()?;
        let mut total = 0.0;

        for index in 0..self.chains.len() {
            self.with_detached_chain(index, |chain, observations, elo_of| {
                total += chain.log_likelihood(w2, observations, elo_of)?;
                Ok(())
            })?;
        }

        Ok(total)
    }

    /// Mean prediction score over all observations, `None` when there are none.
    pub fn prediction_accuracy(&self) -> Result<Option<f64>, WhrError> {
        if self.observations.is_empty() {
            return Ok(None);
        }

        let elo_of = |node: NodeRef| self.chains[node.competitor.0].nodes()[node.index].elo();
        let mut total = 0.0;
        for observation in &self.observations {
            total += observation.prediction_score(&elo_of)?;
        }

        Ok(Some(total / self.observations.len() as f64))
    }
}
