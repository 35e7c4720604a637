//! Exploration schedule of DQN.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer with an exponentially decaying epsilon.
///
/// `eps(t) = eps_end + (eps_start - eps_end) * exp(-t / eps_decay)`, where `t`
/// is the number of actions selected so far in training mode.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Epsilon at the first step.
    pub eps_start: f64,

    /// Epsilon after infinitely many steps.
    pub eps_end: f64,

    /// Time constant of the decay, in steps.
    pub eps_decay: f64,

    /// The number of actions selected in training mode so far.
    #[serde(default)]
    pub steps_done: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_end: 0.02,
            eps_decay: 1_000_000.0,
            steps_done: 0,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer with the given decay constant.
    pub fn with_decay(eps_decay: f64) -> Self {
        Self {
            eps_decay,
            ..Default::default()
        }
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the asymptotic epsilon value.
    pub fn eps_end(mut self, v: f64) -> Self {
        self.eps_end = v;
        self
    }

    /// Epsilon after `steps` actions.
    pub fn eps_at(&self, steps: usize) -> f64 {
        self.eps_end + (self.eps_start - self.eps_end) * (-(steps as f64) / self.eps_decay).exp()
    }

    /// Epsilon for the next action.
    pub fn eps_threshold(&self) -> f64 {
        self.eps_at(self.steps_done)
    }

    /// Returns `true` if the next action should be taken at random.
    ///
    /// Advances the schedule by one step.
    pub fn explore(&mut self, rng: &mut impl Rng) -> bool {
        let eps = self.eps_threshold();
        self.steps_done += 1;
        rng.gen::<f64>() < eps
    }
}
