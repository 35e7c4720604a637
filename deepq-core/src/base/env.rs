//! Environment.
use super::Step;
use anyhow::Result;

/// Represents an environment with a discrete action set.
///
/// This is the step/reset contract of the Atari simulator. Preprocessing
/// wrappers implement the same trait and decorate an inner environment, so
/// that a wrapper chain is again an [`Env`].
pub trait Env {
    /// Observation of the environment.
    type Obs: Clone;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step with the action of the given index.
    fn step(&mut self, act: usize) -> Result<Step<Self::Obs>>;

    /// Returns the meanings of the actions, like `"NOOP"` or `"FIRE"`.
    ///
    /// Wrappers forward this to the innermost environment.
    fn action_meanings(&self) -> Vec<String>;

    /// Returns the number of lives remaining in the game.
    fn lives(&self) -> usize;

    /// Returns the number of actions.
    fn n_actions(&self) -> usize {
        self.action_meanings().len()
    }

    /// Renders the current state of the environment.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Releases resources held by the environment.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: Env + ?Sized> Env for Box<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<Self::Obs> {
        (**self).reset()
    }

    fn step(&mut self, act: usize) -> Result<Step<Self::Obs>> {
        (**self).step(act)
    }

    fn action_meanings(&self) -> Vec<String> {
        (**self).action_meanings()
    }

    fn lives(&self) -> usize {
        (**self).lives()
    }

    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }

    fn render(&mut self) -> Result<()> {
        (**self).render()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
