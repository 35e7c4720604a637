//! Configuration of DQN agent.
use super::{explorer::EpsilonGreedy, DqnModelConfig};
use crate::{cnn::CnnConfig, opt::OptimizerConfig, Device};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constructs [`Dqn`](super::Dqn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig {
    pub(super) model_config: DqnModelConfig<CnnConfig>,
    pub(super) batch_size: usize,
    pub(super) discount_factor: f64,
    pub(super) explorer: EpsilonGreedy,
    #[serde(default)]
    pub(super) clip_grad: Option<f64>,
    pub(super) seed: u64,
    /// Device on which the networks are built.
    #[serde(default)]
    pub device: Device,
}

impl Default for DqnConfig {
    /// Constructs DQN builder with default parameters.
    fn default() -> Self {
        Self {
            model_config: DqnModelConfig::default(),
            batch_size: 32,
            discount_factor: 0.99,
            explorer: EpsilonGreedy::default(),
            clip_grad: Some(1.0),
            seed: 42,
            device: Device::Auto,
        }
    }
}

impl DqnConfig {
    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<CnnConfig>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the configuration of the action-value network.
    pub fn q_config(mut self, q_config: CnnConfig) -> Self {
        self.model_config = self.model_config.q_config(q_config);
        self
    }

    /// Sets the configuration of the optimizer.
    pub fn opt_config(mut self, opt_config: OptimizerConfig) -> Self {
        self.model_config = self.model_config.opt_config(opt_config);
        self
    }

    /// Gradient clipping, `None` disables it.
    pub fn clip_grad(mut self, v: Option<f64>) -> Self {
        self.clip_grad = v;
        self
    }

    /// Random seed for exploration.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Returns the configuration of the action-value network.
    pub fn get_q_config(&self) -> &CnnConfig {
        self.model_config.get_q_config()
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {:?}", path_);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let config = DqnConfig::default()
            .q_config(CnnConfig::default().n_actions(6))
            .explorer(EpsilonGreedy::with_decay(1000.0))
            .device(Device::Cpu);
        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn.yaml");

        config.save(&path)?;
        let config_ = DqnConfig::load(&path)?;
        assert_eq!(config, config_);
        assert_eq!(config_.get_q_config().get_n_actions(), 6);
        Ok(())
    }
}
