use anyhow::Result;
use deepq_core::{Env, Step};
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::check_action_meaning;

/// Takes a random number of no-op actions on reset.
///
/// The number of no-ops is drawn uniformly from `[1, noop_max]`, so that
/// episodes start from different states. If the game ends during the no-ops,
/// the inner environment is reset again. Action 0 must be `"NOOP"`.
pub struct NoopReset<E: Env> {
    inner: E,
    noop_max: usize,
    override_noops: Option<usize>,
    last_noops: usize,
    rng: SmallRng,
}

impl<E: Env> NoopReset<E> {
    /// Wraps `inner`.
    pub fn new(inner: E, noop_max: usize) -> Result<Self> {
        check_action_meaning(&inner, 0, "NOOP")?;
        Ok(Self {
            inner,
            noop_max: noop_max.max(1),
            override_noops: None,
            last_noops: 0,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Seeds the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Takes exactly `n` no-ops on every reset instead of a random number.
    pub fn override_noops(mut self, n: Option<usize>) -> Self {
        self.override_noops = n;
        self
    }

    /// The number of no-ops taken on the last reset.
    pub fn last_noops(&self) -> usize {
        self.last_noops
    }
}

impl<E: Env> Env for NoopReset<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<E::Obs> {
        let mut obs = self.inner.reset()?;
        let noops = match self.override_noops {
            Some(n) => n,
            None => self.rng.gen_range(1..=self.noop_max),
        };
        trace!("{} no-ops on reset", noops);

        for _ in 0..noops {
            let step = self.inner.step(0)?;
            obs = if step.is_done {
                self.inner.reset()?
            } else {
                step.obs
            };
        }
        self.last_noops = noops;

        Ok(obs)
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
    use deepq_core::error::DeepqError;

    #[test]
    fn test_noop_count_in_range() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default());
        let mut env = NoopReset::new(sim.clone(), 30)?.seed(42);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let before = sim.get().actions().len();
            env.reset()?;
            let noops = sim.get().actions().len() - before;
            assert!((1..=30).contains(&noops));
            assert_eq!(noops, env.last_noops());
            seen.insert(noops);
        }
        assert!(seen.len() > 10);
        assert!(sim.get().actions().iter().all(|&a| a == 0));
        Ok(())
    }

    #[test]
    fn test_reset_again_when_done_during_noops() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default().episode_len(3));
        let mut env = NoopReset::new(sim.clone(), 30)?.override_noops(Some(7));

        let obs = env.reset()?;
        // Resets at the start and after noops 3 and 6
        assert_eq!(sim.get().n_resets(), 3);
        assert_eq!(sim.get().t(), 1);
        assert_eq!(obs[[0, 0, 0]], 1);
        Ok(())
    }

    #[test]
    fn test_requires_noop_action() {
        let sim = ScriptedSimulator::default().action_meanings(&["FIRE", "NOOP"]);
        let err = NoopReset::new(sim, 30).err().unwrap();
        assert_eq!(
            err.downcast_ref::<DeepqError>(),
            Some(&DeepqError::MissingActionMeaning {
                index: 0,
                expected: "NOOP".into(),
                found: Some("FIRE".into()),
            })
        );
    }
}
