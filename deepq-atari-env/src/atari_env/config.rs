//! Configuration of the Arcade Learning Environment.
//!
//! If environment variable `ATARI_ROM_DIR` exists, it is used as the directory
//! from which ROM images of the Atari games are loaded.
use serde::{Deserialize, Serialize};
use std::{default::Default, env, path::PathBuf};

/// Configuration of the simulator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AleConfig {
    /// Name of the game, the ROM file is `<rom_dir>/<name>.bin`.
    pub name: String,

    /// Directory of ROM files.
    pub rom_dir: Option<String>,

    /// Path of the ROM file, overriding `rom_dir` and `name`.
    pub rom_path: Option<String>,

    /// Random seed of the emulator; `0` means the current time.
    pub random_seed: i32,

    /// Number of emulator frames per step; `1` is no skip.
    pub frame_skip: i32,

    /// Probability of repeating the previous action.
    pub repeat_action_probability: f32,
}

impl Default for AleConfig {
    fn default() -> Self {
        Self {
            name: "pong".to_string(),
            rom_dir: env::var("ATARI_ROM_DIR").ok(),
            rom_path: None,
            random_seed: 0,
            frame_skip: 1,
            repeat_action_probability: 0.0,
        }
    }
}

impl AleConfig {
    /// Sets the name of the game.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the directory of ROM files.
    pub fn rom_dir(mut self, dir: impl Into<String>) -> Self {
        self.rom_dir = Some(dir.into());
        self
    }

    /// Sets the random seed of the emulator.
    pub fn random_seed(mut self, seed: i32) -> Self {
        self.random_seed = seed;
        self
    }

    /// Resolves the path of the ROM file.
    ///
    /// Falls back to `$HOME/atari_rom` if neither a path nor a directory is
    /// given.
    pub fn rom_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.rom_path {
            return Some(PathBuf::from(path));
        }
        let dir = match &self.rom_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()?.join("atari_rom"),
        };
        Some(dir.join(format!("{}.bin", self.name)))
    }
}
