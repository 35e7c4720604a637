use anyhow::Result;
use deepq_core::{Env, Step};

/// Multiplies rewards by a constant, `0.1` by default.
pub struct ScaleReward<E: Env> {
    inner: E,
    scale: f32,
}

impl<E: Env> ScaleReward<E> {
    /// Wraps `inner`, scaling rewards by `0.1`.
    pub fn new(inner: E) -> Self {
        Self::with_scale(inner, 0.1)
    }

    /// Wraps `inner`, scaling rewards by `scale`.
    pub fn with_scale(inner: E, scale: f32) -> Self {
        Self { inner, scale }
    }
}

impl<E: Env> Env for ScaleReward<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<E::Obs> {
        self.inner.reset()
    }

    fn step(&mut self, act: usize) -> Result<Step<E::Obs>> {
        let mut step = self.inner.step(act)?;
        step.reward *= self.scale;
        Ok(step)
    }

    fn action_meanings(&self) -> Vec<String> {
        self.inner.action_meanings()
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn render(&mut self) -> Result<()> {
        self.inner.render()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
