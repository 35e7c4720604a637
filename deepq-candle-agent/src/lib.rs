#![warn(missing_docs)]
//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
//!
//! The agent approximates action values with the convolutional network of
//! the DQN paper ([`cnn::Cnn`]), keeps a policy and a target copy of it
//! ([`dqn::DqnModel`]), and is trained from a
//! [`ReplayBuffer`](deepq_core::replay_buffer::ReplayBuffer) by
//! [`Trainer`](deepq_core::Trainer).
pub mod cnn;
pub mod dqn;
pub mod model;
pub mod opt;
pub mod util;
use candle_core::Tensor;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),

    /// The first GPU device if available, otherwise CPU.
    Auto,
}

impl Default for Device {
    fn default() -> Self {
        Self::Auto
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
            Device::Auto => candle_core::Device::cuda_if_available(0),
        }
    }
}

/// Observations that can be batched into an input tensor of the agent.
///
/// The batch is a `u8` tensor of shape `(n, channels, height, width)`;
/// scaling to `[0, 1]` is done by the network.
pub trait ObsTensor: Sized {
    /// Stacks observations into a batch on the given device.
    fn to_tensor_batch(obs: &[&Self], device: &candle_core::Device) -> anyhow::Result<Tensor>;
}
