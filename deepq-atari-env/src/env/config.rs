//! Configuration of [`make_env`](super::make_env).
use serde::{Deserialize, Serialize};

/// Configuration of the wrapper chain built by [`make_env`](super::make_env).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AtariWrapperConfig {
    /// Ends episodes on life loss.
    pub episodic_life: bool,

    /// Maximum number of no-ops on reset.
    pub noop_max: usize,

    /// Number of repeats of each action.
    pub skip: usize,

    /// Width of preprocessed frames.
    pub frame_width: usize,

    /// Height of preprocessed frames.
    pub frame_height: usize,

    /// Number of stacked frames.
    pub frame_stack: usize,

    /// Bins rewards to their sign.
    pub clip_rewards: bool,

    /// Multiplies rewards by 0.1.
    pub scale_rewards: bool,

    /// Seed of the no-op sampler, from entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for AtariWrapperConfig {
    fn default() -> Self {
        Self {
            episodic_life: true,
            noop_max: 30,
            skip: 4,
            frame_width: 84,
            frame_height: 84,
            frame_stack: 4,
            clip_rewards: false,
            scale_rewards: false,
            seed: None,
        }
    }
}

impl AtariWrapperConfig {
    /// Enables episodic life.
    pub fn episodic_life(mut self, v: bool) -> Self {
        self.episodic_life = v;
        self
    }

    /// Sets the maximum number of no-ops on reset.
    pub fn noop_max(mut self, v: usize) -> Self {
        self.noop_max = v;
        self
    }

    /// Sets the number of repeats of each action.
    pub fn skip(mut self, v: usize) -> Self {
        self.skip = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_stack(mut self, v: usize) -> Self {
        self.frame_stack = v;
        self
    }

    /// Sets the size of preprocessed frames.
    pub fn frame_size(mut self, width: usize, height: usize) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    /// Enables reward clipping.
    pub fn clip_rewards(mut self, v: bool) -> Self {
        self.clip_rewards = v;
        self
    }

    /// Enables reward scaling.
    pub fn scale_rewards(mut self, v: bool) -> Self {
        self.scale_rewards = v;
        self
    }

    /// Sets the seed of the no-op sampler.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
