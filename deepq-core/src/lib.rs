#![warn(missing_docs)]
//! Core of deepq: environments, agents, experience replay and the training loop.
//!
//! The crate is independent of any deep learning backend and of the Atari
//! simulator. Preprocessing wrappers live in `deepq-atari-env`, the DQN agent
//! in `deepq-candle-agent`.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Agent, Configurable, Env, ExperienceBufferBase, Policy, ReplayBufferBase, Step,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{RewardHistory, Trainer, TrainerConfig};
