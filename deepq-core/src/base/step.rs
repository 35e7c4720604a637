//! Environment step.
use crate::record::Record;

/// Represents an observation, reward and termination flag `(o_t+1, r_t, done)`
/// with some additional information.
///
/// An environment emits a [`Step`] object at every interaction step.
/// The training loop turns it into a transition `(o_t, a_t, o_t+1, r_t)`.
#[derive(Debug)]
pub struct Step<O> {
    /// Observation.
    pub obs: O,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode ended.
    pub is_done: bool,

    /// Information added by the environment or its wrappers, like `lives`.
    pub info: Record,
}

impl<O> Step<O> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: O, reward: f32, is_done: bool, info: Record) -> Self {
        Self {
            obs,
            reward,
            is_done,
            info,
        }
    }

    /// Replaces the observation, keeping reward, flag and information.
    ///
    /// Used by wrappers transforming observations.
    pub fn map_obs<P>(self, f: impl FnOnce(O) -> P) -> Step<P> {
        Step {
            obs: f(self.obs),
            reward: self.reward,
            is_done: self.is_done,
            info: self.info,
        }
    }
}
