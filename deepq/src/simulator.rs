//! Construction of the Atari simulator.
use crate::ExperimentConfig;
use anyhow::Result;
use deepq_atari_env::Frame;
use deepq_core::Env;

/// Raw simulator producing RGB frames.
pub type Simulator = Box<dyn Env<Obs = Frame>>;

/// Opens the simulator of the configured game.
#[cfg(feature = "ale")]
pub fn build_simulator(config: &ExperimentConfig) -> Result<Simulator> {
    use deepq_atari_env::atari_env::AleSimulator;
    Ok(Box::new(AleSimulator::new(&config.ale)?))
}

/// Fails, the Arcade Learning Environment is not compiled in.
#[cfg(not(feature = "ale"))]
pub fn build_simulator(config: &ExperimentConfig) -> Result<Simulator> {
    anyhow::bail!(
        "Cannot open {:?}: deepq was built without the `ale` feature",
        config.ale.name
    )
}
