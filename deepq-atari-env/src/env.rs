//! The standard wrapper chain.
mod config;
use crate::{
    wrappers::{
        ClipReward, EpisodicLife, FireReset, FrameStack, MaxAndSkip, NoopReset, ScaleReward,
        WarpFrame,
    },
    Frame, LazyFrames,
};
use anyhow::Result;
pub use config::AtariWrapperConfig;
use deepq_core::Env;
use log::info;

/// Preprocessed Atari environment.
pub type AtariEnv = Box<dyn Env<Obs = LazyFrames>>;

/// Wraps a simulator with the preprocessing of DQN.
///
/// From the outermost layer:
///
/// ```text
/// ClipReward? -> ScaleReward? -> FrameStack -> WarpFrame -> FireReset?
///     -> MaxAndSkip -> NoopReset -> EpisodicLife? -> simulator
/// ```
///
/// [`FireReset`] is inserted if the action set contains `"FIRE"`.
pub fn make_env<E>(sim: E, config: &AtariWrapperConfig) -> Result<AtariEnv>
where
    E: Env<Obs = Frame> + 'static,
{
    let mut env: Box<dyn Env<Obs = Frame>> = if config.episodic_life {
        Box::new(EpisodicLife::new(sim))
    } else {
        Box::new(sim)
    };

    let mut noop_reset = NoopReset::new(env, config.noop_max)?;
    if let Some(seed) = config.seed {
        noop_reset = noop_reset.seed(seed);
    }
    env = Box::new(MaxAndSkip::new(noop_reset, config.skip));

    if env.action_meanings().iter().any(|m| m == "FIRE") {
        env = Box::new(FireReset::new(env)?);
    }

    let env = WarpFrame::with_size(env, config.frame_width, config.frame_height);
    let mut env: AtariEnv = Box::new(FrameStack::new(env, config.frame_stack));

    if config.scale_rewards {
        env = Box::new(ScaleReward::new(env));
    }
    if config.clip_rewards {
        env = Box::new(ClipReward::new(env));
    }

    info!(
        "Atari environment with {} actions: {:?}",
        env.n_actions(),
        env.action_meanings()
    );
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{ScriptedSimulator, SharedSimulator};

    #[test]
    fn test_default_chain() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default().rewards(|_, _| -1.0));
        let config = AtariWrapperConfig::default().seed(1);
        let mut env = make_env(sim.clone(), &config)?;

        let obs = env.reset()?;
        assert_eq!(obs.shape(), [84, 84, 4]);
        // No-ops, then FIRE and action 2, each repeated 4 times
        let actions = sim.get().actions().to_vec();
        let n = actions.len();
        assert_eq!(&actions[n - 8..], &[1, 1, 1, 1, 2, 2, 2, 2]);
        assert!((1..=30).contains(&(n - 8)));

        let step = env.step(3)?;
        assert_eq!(step.reward, -4.0);
        assert_eq!(step.obs.shape(), [84, 84, 4]);
        assert_eq!(sim.get().actions().len(), n + 4);
        Ok(())
    }

    #[test]
    fn test_without_fire_and_with_clipping() -> Result<()> {
        let sim = ScriptedSimulator::default()
            .action_meanings(&["NOOP", "UP", "DOWN"])
            .rewards(|_, _| 5.0);
        let sim = SharedSimulator::new(sim);
        let config = AtariWrapperConfig::default()
            .frame_stack(1)
            .clip_rewards(true)
            .scale_rewards(true);
        let mut env = make_env(sim.clone(), &config)?;

        env.reset()?;
        assert!(sim.get().actions().iter().all(|&a| a == 0));
        let step = env.step(1)?;
        assert_eq!(step.obs.shape(), [84, 84, 1]);
        // 4 * 5 * 0.1, then clipped
        assert_eq!(step.reward, 1.0);
        Ok(())
    }

    #[test]
    fn test_close_reaches_simulator() -> Result<()> {
        let sim = SharedSimulator::new(ScriptedSimulator::default());
        let mut env = make_env(sim.clone(), &AtariWrapperConfig::default())?;
        env.close()?;
        assert_eq!(sim.get().n_closes(), 1);
        Ok(())
    }
}
