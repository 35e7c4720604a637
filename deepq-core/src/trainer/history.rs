//! Episode rewards collected during training.
use serde::{Deserialize, Serialize};

/// Episode rewards and their running means.
///
/// `points` holds `(episode, mean reward of the last window episodes)`,
/// one entry per logging interval. It is the data of the reward plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardHistory {
    /// Total reward of every finished episode.
    pub episode_rewards: Vec<f32>,

    /// Logged `(episode, mean reward)` pairs.
    pub points: Vec<(usize, f32)>,
}

impl RewardHistory {
    /// Appends the total reward of a finished episode.
    pub fn push_episode(&mut self, reward: f32) {
        self.episode_rewards.push(reward);
    }

    /// Mean reward of the last `n` episodes, `None` if no episode finished.
    pub fn mean_of_last(&self, n: usize) -> Option<f32> {
        let len = self.episode_rewards.len();
        if len == 0 || n == 0 {
            return None;
        }
        let tail = &self.episode_rewards[len.saturating_sub(n)..];
        Some(tail.iter().sum::<f32>() / tail.len() as f32)
    }

    /// Stores `(episode, mean of the last n rewards)` and returns the mean.
    pub fn log_point(&mut self, episode: usize, n: usize) -> Option<f32> {
        let mean = self.mean_of_last(n)?;
        self.points.push((episode, mean));
        Some(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_last() {
        let mut history = RewardHistory::default();
        assert_eq!(history.mean_of_last(20), None);

        for r in [-21.0, -20.0, -19.0, -18.0] {
            history.push_episode(r);
        }
        assert_eq!(history.mean_of_last(2), Some(-18.5));
        // Shorter history than the window
        assert_eq!(history.mean_of_last(20), Some(-19.5));

        assert_eq!(history.log_point(3, 2), Some(-18.5));
        assert_eq!(history.points, vec![(3, -18.5)]);
    }
}
