//! Atari environments for deepq.
//!
//! Raw frames come from a simulator implementing [`Env`](deepq_core::Env)
//! with [`Frame`] observations: [`AleSimulator`](atari_env::AleSimulator)
//! with the `ale` feature, or the scripted simulator in [`util::test`].
//! [`make_env`] applies the preprocessing of
//! [`atari_wrapper.py`](https://github.com/openai/baselines/blob/master/baselines/common/atari_wrappers.py):
//!
//! ```no_run
//! use anyhow::Result;
//! use deepq_atari_env::{make_env, util::test::ScriptedSimulator, AtariWrapperConfig};
//! use deepq_core::Env as _;
//!
//! fn main() -> Result<()> {
//!     let sim = ScriptedSimulator::default();
//!     let mut env = make_env(sim, &AtariWrapperConfig::default())?;
//!     let obs = env.reset()?;
//!     assert_eq!(obs.shape(), [84, 84, 4]);
//!     let step = env.step(1)?;
//!     println!("reward = {}", step.reward);
//!     Ok(())
//! }
//! ```
pub mod atari_env;
#[cfg(feature = "candle")]
pub mod candle;
mod env;
mod frame;
pub mod util;
pub mod wrappers;
pub use env::{make_env, AtariEnv, AtariWrapperConfig};
pub use frame::{Frame, LazyFrames};
