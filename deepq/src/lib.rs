#![warn(missing_docs)]
//! A Deep Q-Network agent learning Atari games from pixels.
//!
//! deepq consists of the following crates:
//!
//! * [deepq-core](../deepq_core/index.html) provides the environment and agent
//!   traits, the replay buffer, records and the training loop. It is
//!   independent of the deep learning backend and of the simulator.
//! * [deepq-atari-env](../deepq_atari_env/index.html) wraps the Arcade Learning
//!   Environment and implements the preprocessing of DQN as a chain of
//!   wrappers.
//! * [deepq-candle-agent](../deepq_candle_agent/index.html) is the DQN agent
//!   based on [candle](https://crates.io/crates/candle-core).
//! * This crate is the `deepq` command, which trains and evaluates the agent
//!   and projects its learned features to 2D for inspection.
pub mod config;
pub mod embedding;
pub mod plot;
pub mod simulator;
pub use config::{EmbeddingConfig, ExperimentConfig};
