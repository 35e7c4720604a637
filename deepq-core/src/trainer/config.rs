//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// Environment steps before the first optimization step.
    pub initial_memory: usize,

    /// Interval of target network synchronization in environment steps.
    pub target_update: usize,

    /// Interval of logging the mean episode reward, in episodes.
    pub log_interval: usize,

    /// Renders the environment at every step if `true`.
    pub render: bool,

    /// Where to save the trained model.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 1400,
            initial_memory: 10_000,
            target_update: 1000,
            log_interval: 20,
            render: false,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the number of environment steps before optimization starts.
    pub fn initial_memory(mut self, v: usize) -> Self {
        self.initial_memory = v;
        self
    }

    /// Sets the interval of target network synchronization in environment steps.
    pub fn target_update(mut self, v: usize) -> Self {
        self.target_update = v;
        self
    }

    /// Sets the interval of logging in episodes.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Enables rendering of the environment.
    pub fn render(mut self, v: bool) -> Self {
        self.render = v;
        self
    }

    /// Sets the directory where the trained model is saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
