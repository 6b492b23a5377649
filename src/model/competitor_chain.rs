use std::f64::consts::PI;

use crate::{
    error::WhrError,
    model::{
        constants::{HESSIAN_DAMPING, MAX_ABS_R},
        observation::{EloLookup, Observation},
        rating_node::RatingNode,
        structures::ids::{CompetitorId, NodeRef, ObservationId},
        tridiagonal::SymmetricTridiagonal
    }
};

/// All rating nodes of one competitor, ordered by time step.
///
/// Consecutive nodes are tied together by a Gaussian random walk whose
/// variance is `w2` (in r² units) per elapsed time step.
#[derive(Debug, Clone, Default)]
pub struct CompetitorChain {
    id: CompetitorId,
    name: String,
    nodes: Vec<RatingNode>
}

impl CompetitorChain {
    pub fn new(id: CompetitorId, name: &str) -> Self {
        CompetitorChain {
            id,
            name: name.to_string(),
            nodes: Vec::new()
        }
    }

    pub fn id(&self) -> CompetitorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[RatingNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&RatingNode> {
        self.nodes.get(index)
    }

    pub fn latest(&self) -> Option<&RatingNode> {
        self.nodes.last()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes are only ever appended, so a time step before the latest node is rejected.
    pub fn check_time_step(&self, time_step: i64) -> Result<(), WhrError> {
        match self.latest() {
            Some(node) if time_step < node.time_step() => Err(WhrError::OutOfOrder {
                competitor: self.name.clone(),
                time_step,
                latest: node.time_step()
            }),
            _ => Ok(())
        }
    }

    /// Files the observation on the node for its time step, appending that node
    /// if needed, and returns a reference to the node.
    pub fn record_result_at(&mut self, id: ObservationId, observation: &Observation) -> NodeRef {
        let time_step = observation.time_step();

        let needs_node = self.latest().map_or(true, |node| node.time_step() != time_step);
        if needs_node {
            let node = match self.latest() {
                Some(previous) => RatingNode::new(time_step, previous.gamma(), false),
                None => RatingNode::new(time_step, 1.0, true)
            };
            self.nodes.push(node);
        }

        let index = self.nodes.len() - 1;
        self.nodes[index].record_result(id, observation, self.id);

        NodeRef {
            competitor: self.id,
            index
        }
    }

    /// Random walk variance between node `i` and node `i + 1`.
    pub fn sigma2(&self, w2: f64) -> Vec<f64> {
        self.nodes
            .windows(2)
            .map(|pair| pair[1].time_step().abs_diff(pair[0].time_step()) as f64 * w2)
            .collect()
    }

    /// Opponent strengths are re-read on the next term access.
    fn invalidate_terms(&mut self) {
        for node in &mut self.nodes {
            node.invalidate_terms();
        }
    }

    fn derivatives(&mut self, observations: &[Observation], elo_of: EloLookup) -> Result<(Vec<f64>, Vec<f64>), WhrError> {
        let own = self.id;
        let derivatives = self
            .nodes
            .iter_mut()
            .map(|node| node.derivatives(own, observations, elo_of))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(derivatives.into_iter().unzip())
    }

    /// Hessian of the log-posterior: likelihood curvature plus the random walk prior.
    pub fn hessian(second_derivatives: &[f64], sigma2: &[f64]) -> SymmetricTridiagonal {
        let n = second_derivatives.len();

        let diagonal = (0..n)
            .map(|i| {
                let mut prior = 0.0;
                if i < n - 1 {
                    prior -= 1.0 / sigma2[i];
                }
                if i > 0 {
                    prior -= 1.0 / sigma2[i - 1];
                }
                second_derivatives[i] + prior - HESSIAN_DAMPING
            })
            .collect();
        let off_diagonal = sigma2.iter().map(|s| 1.0 / s).collect();

        SymmetricTridiagonal::new(diagonal, off_diagonal)
    }

    /// Gradient of the log-posterior with respect to each node's r.
    pub fn gradient(&self, first_derivatives: &[f64], sigma2: &[f64]) -> Vec<f64> {
        let n = self.nodes.len();
        let r: Vec<f64> = self.nodes.iter().map(|node| node.r()).collect();

        (0..n)
            .map(|i| {
                let mut prior = 0.0;
                if i < n - 1 {
                    prior -= (r[i] - r[i + 1]) / sigma2[i];
                }
                if i > 0 {
                    prior -= (r[i] - r[i - 1]) / sigma2[i - 1];
                }
                first_derivatives[i] + prior
            })
            .collect()
    }

    /// One Newton-Raphson step on every node of the chain at once.
    ///
    /// Nothing is written if the proposed ratings are unstable.
    pub fn run_newton_iteration(
        &mut self,
        w2: f64,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<(), WhrError> {
        self.invalidate_terms();

        let new_r = match self.nodes.len() {
            0 => return Ok(()),
            1 => vec![self.nodes[0].newton_step(self.id, observations, elo_of)?],
            _ => {
                let sigma2 = self.sigma2(w2);
                let (first, second) = self.derivatives(observations, elo_of)?;
                let h = Self::hessian(&second, &sigma2);
                let g = self.gradient(&first, &sigma2);
                let x = h.solve(&g);

                self.nodes.iter().zip(x).map(|(node, dx)| node.r() - dx).collect()
            }
        };

        if let Some(&r) = new_r.iter().find(|r| !r.is_finite() || r.abs() > MAX_ABS_R) {
            return Err(WhrError::UnstableRating {
                competitor: self.name.clone(),
                r
            });
        }

        for (node, r) in self.nodes.iter_mut().zip(new_r) {
            node.set_r(r);
        }

        Ok(())
    }

    /// Assigns each node the posterior variance of its r, the diagonal of `-H⁻¹`.
    pub fn update_uncertainty(
        &mut self,
        w2: f64,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<(), WhrError> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        self.invalidate_terms();
        let sigma2 = self.sigma2(w2);
        let (_, second) = self.derivatives(observations, elo_of)?;
        let variances = Self::hessian(&second, &sigma2).inverse_diagonal();

        for (node, inverse) in self.nodes.iter_mut().zip(variances) {
            node.set_uncertainty(-inverse);
        }

        Ok(())
    }

    /// Log-likelihood of every node plus the log-density of each random walk step.
    pub fn log_likelihood(
        &mut self,
        w2: f64,
        observations: &[Observation],
        elo_of: EloLookup
    ) -> Result<f64, WhrError> {
        self.invalidate_terms();
        let own = self.id;
        let sigma2 = self.sigma2(w2);

        let mut result = 0.0;
        for node in &mut self.nodes {
            result += node.log_likelihood(own, observations, elo_of)?;
        }

        for (pair, s2) in self.nodes.windows(2).zip(sigma2) {
            let rd = pair[1].r() - pair[0].r();
            result += -0.5 * (2.0 * PI * s2).ln() - rd * rd / (2.0 * s2);
        }

        Ok(result)
    }
}
