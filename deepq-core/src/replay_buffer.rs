//! Ring replay buffer with uniform sampling.
mod base;
mod config;
mod transition;
pub use base::ReplayBuffer;
pub use config::ReplayBufferConfig;
pub use transition::{Transition, TransitionBatch};
