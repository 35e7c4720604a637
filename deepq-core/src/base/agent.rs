//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters. Returns `None` if the step was skipped,
    /// for example because the buffer does not hold a full batch yet.
    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>>;

    /// Copies the parameters of the policy network into the target network.
    fn sync_target(&mut self) -> Result<()>;

    /// Save the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files consisting the agent
    /// in the directory. For example, the DQN agent in `deepq-candle-agent`
    /// saves the full model and a weights-only snapshot.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
