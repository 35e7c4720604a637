//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes and collects their total rewards.
///
/// An agent in evaluation mode acts greedily, so the evaluation has no
/// exploration.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::new(env, 5);
/// agent.eval();
/// let rewards = evaluator.evaluate(&mut agent)?;
/// evaluator.close()?;
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// Renders the environment at every step if `true`.
    render: bool,

    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Vec<f32>> {
        let mut rewards = Vec::with_capacity(self.n_episodes);

        for episode in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut total_reward = 0f32;

            loop {
                let act = policy.sample(&obs)?;
                if self.render {
                    self.env.render()?;
                }
                let step = self.env.step(act)?;
                total_reward += step.reward;
                if step.is_done {
                    break;
                }
                obs = step.obs;
            }

            info!("Finished episode {} with reward {}", episode, total_reward);
            rewards.push(total_reward);
        }

        Ok(rewards)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`] running `n_episodes` on `env`.
    pub fn new(env: E, n_episodes: usize) -> Self {
        Self {
            n_episodes,
            render: false,
            env,
        }
    }

    /// Enables rendering of the environment.
    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Closes the environment.
    pub fn close(mut self) -> Result<()> {
        self.env.close()
    }
}
