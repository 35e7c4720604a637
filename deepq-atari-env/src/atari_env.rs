//! Atari simulator.
//!
//! The bindings under `ale` are adapted from the
//! [`atari-env`](https://crates.io/crates/atari-env) crate, which does not
//! expose the number of lives needed for episodic life.
//!
//! You need to place Atari ROM files under the directory specified by
//! environment variable `ATARI_ROM_DIR`. An easy way to do this is to use
//! [AutoROM](https://pypi.org/project/AutoROM/) Python package.
//!
//! ```bash
//! pip install autorom
//! mkdir $HOME/atari_rom
//! AutoROM --install-dir $HOME/atari_rom
//! export ATARI_ROM_DIR=$HOME/atari_rom
//! ```
mod config;
pub use config::AleConfig;

#[cfg(feature = "ale")]
mod ale;
#[cfg(feature = "ale")]
mod simulator;
#[cfg(feature = "ale")]
pub use simulator::AleSimulator;
