use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    pub(super) in_channels: usize,
    pub(super) n_actions: usize,
    pub(super) input_size: usize,
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self {
            in_channels: 4,
            n_actions: 4,
            input_size: 84,
        }
    }
}

impl CnnConfig {
    /// Sets the number of stacked frames.
    pub fn in_channels(mut self, v: usize) -> Self {
        self.in_channels = v;
        self
    }

    /// Sets the number of actions, the output dimension.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the height and width of input frames.
    pub fn input_size(mut self, v: usize) -> Self {
        self.input_size = v;
        self
    }

    /// Returns the number of actions.
    pub fn get_n_actions(&self) -> usize {
        self.n_actions
    }
}
