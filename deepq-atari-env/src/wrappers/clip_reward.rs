use anyhow::Result;
use deepq_core::{Env, Step};

/// Bins rewards to `{-1, 0, 1}` by their sign.
pub struct ClipReward<E: Env> {
    inner: E,
}

impl<E: Env> ClipReward<E> {
    /// Wraps `inner`.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

fn sign(r: f32) -> f32 {
    if r > 0.0 {
        1.0
    } else if r < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl<E: Env> Env for ClipReward<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<E::Obs> {
        self.inner.reset()
    }

    fn step(&mut self, act: usize) -> Result<Step<E::Obs>> {
        let mut step = self.inner.step(act)?;
        step.reward = sign(step.reward);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::ScriptedSimulator;

    #[test]
    fn test_clip() -> Result<()> {
        let sim = ScriptedSimulator::default().rewards(|t, _| [0.0, 3.5, -0.2, 0.0][t % 4]);
        let mut env = ClipReward::new(sim);
        env.reset()?;
        let rewards = (0..4)
            .map(|_| env.step(0).map(|s| s.reward))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(rewards, vec![1.0, -1.0, 0.0, 0.0]);
        Ok(())
    }
}
