//! Configuration of an experiment.
use anyhow::{bail, Result};
use deepq_atari_env::{atari_env::AleConfig, AtariWrapperConfig};
use deepq_candle_agent::dqn::DqnConfig;
use deepq_core::{replay_buffer::ReplayBufferConfig, TrainerConfig};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of the feature embedding analysis.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EmbeddingConfig {
    /// The number of greedy episodes to play.
    pub n_episodes: usize,

    /// Features are collected every `interval` steps.
    pub interval: usize,

    /// The number of most recent samples to project.
    pub max_samples: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            n_episodes: 20,
            interval: 15,
            max_samples: 1000,
        }
    }
}

/// Configuration of an experiment, stored as a single YAML file.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ExperimentConfig {
    /// The simulator.
    pub ale: AleConfig,

    /// The preprocessing wrappers.
    pub env: AtariWrapperConfig,

    /// The agent. The network input follows `env`, see
    /// [`ExperimentConfig::agent_config`].
    pub agent: DqnConfig,

    /// The training loop.
    pub trainer: TrainerConfig,

    /// The replay buffer.
    pub replay_buffer: ReplayBufferConfig,

    /// The number of episodes of `eval`.
    pub n_eval_episodes: usize,

    /// Where `eval` writes the frames of the played episodes.
    pub video_dir: String,

    /// The feature embedding of `embed`.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            ale: AleConfig::default(),
            env: AtariWrapperConfig::default(),
            agent: DqnConfig::default(),
            trainer: TrainerConfig::default(),
            replay_buffer: ReplayBufferConfig::default(),
            n_eval_episodes: 5,
            video_dir: "./videos/dqn_pong_video".to_string(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Constructs [`ExperimentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(&path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load experiment config from {:?}", path.as_ref());
        Ok(b)
    }

    /// Saves [`ExperimentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Agent configuration consistent with the preprocessed observations
    /// and the action set of the game.
    pub fn agent_config(&self, n_actions: usize) -> Result<DqnConfig> {
        if self.env.frame_width != self.env.frame_height {
            bail!(
                "Frames must be square, got {}x{}",
                self.env.frame_width,
                self.env.frame_height
            );
        }
        let q_config = self
            .agent
            .get_q_config()
            .clone()
            .in_channels(self.env.frame_stack)
            .n_actions(n_actions)
            .input_size(self.env.frame_width);
        Ok(self.agent.clone().q_config(q_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepq_candle_agent::Device;
    use tempdir::TempDir;

    #[test]
    fn test_serde_experiment_config() -> Result<()> {
        let mut config = ExperimentConfig::default();
        config.agent = config.agent.device(Device::Cpu);
        config.trainer = config.trainer.n_episodes(3).model_dir("model");
        let dir = TempDir::new("experiment_config")?;
        let path = dir.path().join("experiment.yaml");

        config.save(&path)?;
        let config_ = ExperimentConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_agent_config_follows_env() -> Result<()> {
        let mut config = ExperimentConfig::default();
        config.env = config.env.frame_stack(2);
        let agent = config.agent_config(6)?;
        let q = agent.get_q_config();
        assert_eq!(q.get_n_actions(), 6);

        config.env.frame_height = 42;
        assert!(config.agent_config(6).is_err());
        Ok(())
    }
}
