//! Preprocessing wrappers.
//!
//! Each wrapper implements [`Env`](deepq_core::Env) and owns the environment
//! it decorates. [`make_env`](crate::make_env) composes them in the standard
//! order for DQN on Atari games.
mod clip_reward;
mod episodic_life;
mod fire_reset;
mod frame_stack;
mod max_and_skip;
mod noop_reset;
mod record_episodes;
mod scale_reward;
mod warp_frame;
pub use clip_reward::ClipReward;
pub use episodic_life::EpisodicLife;
pub use fire_reset::FireReset;
pub use frame_stack::FrameStack;
pub use max_and_skip::MaxAndSkip;
pub use noop_reset::NoopReset;
pub use record_episodes::RecordEpisodes;
pub use scale_reward::ScaleReward;
pub use warp_frame::{warp, WarpFrame};

use anyhow::Result;
use deepq_core::{error::DeepqError, Env};

/// Fails unless the action at `index` means `expected`.
pub(crate) fn check_action_meaning<E: Env + ?Sized>(
    env: &E,
    index: usize,
    expected: &str,
) -> Result<()> {
    let meanings = env.action_meanings();
    match meanings.get(index) {
        Some(m) if m == expected => Ok(()),
        found => Err(DeepqError::MissingActionMeaning {
            index,
            expected: expected.to_string(),
            found: found.cloned(),
        }
        .into()),
    }
}
