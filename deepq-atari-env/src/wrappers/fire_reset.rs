use anyhow::Result;
use deepq_core::{error::DeepqError, Env, Step};

use super::check_action_meaning;

/// Presses FIRE on reset, for games that wait for it before starting.
///
/// Action 1 must be `"FIRE"` and the action set must have at least three
/// actions.
pub struct FireReset<E: Env> {
    inner: E,
}

impl<E: Env> FireReset<E> {
    /// Wraps `inner`.
    pub fn new(inner: E) -> Result<Self> {
        check_action_meaning(&inner, 1, "FIRE")?;
        let n = inner.n_actions();
        if n < 3 {
            return Err(DeepqError::TooFewActions {
                required: 3,
                found: n,
            }
            .into());
        }
        Ok(Self { inner })
    }
}

impl<E: Env> Env for FireReset<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<E::Obs> {
        self.inner.reset()?;
        if self.inner.step(1)?.is_done {
            self.inner.reset()?;
        }
        let step = self.inner.step(2)?;
        if step.is_done {
            self.inner.reset()
        } else {
            Ok(step.obs)
        }
    }

    fn step(&mut self, act: usize) -> Result<Step<E::Obs>> {
        self.inner.step(act)
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
    use crate::util::test::{ScriptedSimulator, SharedSimulator};

    #[test]
    fn test_presses_fire_then_action_2() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default());
        let mut env = FireReset::new(sim.clone())?;

        let obs = env.reset()?;
        assert_eq!(sim.get().actions(), &[1, 2]);
        assert_eq!(obs[[0, 0, 0]], 2);
        Ok(())
    }

    #[test]
    fn test_resets_when_done() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default().episode_len(1));
        let mut env = FireReset::new(sim.clone())?;

        let obs = env.reset()?;
        assert_eq!(sim.get().n_resets(), 3);
        assert_eq!(obs[[0, 0, 0]], 0);
        Ok(())
    }

    #[test]
    fn test_preconditions() {
        let sim = ScriptedSimulator::default().action_meanings(&["NOOP", "RIGHT", "LEFT"]);
        let err = FireReset::new(sim).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<DeepqError>(),
            Some(DeepqError::MissingActionMeaning { index: 1, .. })
        ));

        let sim = ScriptedSimulator::default().action_meanings(&["NOOP", "FIRE"]);
        let err = FireReset::new(sim).err().unwrap();
        assert_eq!(
            err.downcast_ref::<DeepqError>(),
            Some(&DeepqError::TooFewActions {
                required: 3,
                found: 2
            })
        );
    }
}
