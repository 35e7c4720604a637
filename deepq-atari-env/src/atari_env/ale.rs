//! Bindings to the Arcade Learning Environment.
use super::AleConfig;
use anyhow::{anyhow, Result};
use c_str_macro::c_str;
use num_traits::FromPrimitive;
use std::{ffi::CString, path::Path};

#[derive(Copy, Clone, Debug, PartialEq, num_derive::FromPrimitive)]
#[repr(i32)]
pub enum AleAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

impl AleAction {
    /// Meaning of the action as in the Gym Atari environments.
    pub fn meaning(self) -> &'static str {
        match self {
            Self::Noop => "NOOP",
            Self::Fire => "FIRE",
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
            Self::Down => "DOWN",
            Self::UpRight => "UPRIGHT",
            Self::UpLeft => "UPLEFT",
            Self::DownRight => "DOWNRIGHT",
            Self::DownLeft => "DOWNLEFT",
            Self::UpFire => "UPFIRE",
            Self::RightFire => "RIGHTFIRE",
            Self::LeftFire => "LEFTFIRE",
            Self::DownFire => "DOWNFIRE",
            Self::UpRightFire => "UPRIGHTFIRE",
            Self::UpLeftFire => "UPLEFTFIRE",
            Self::DownRightFire => "DOWNRIGHTFIRE",
            Self::DownLeftFire => "DOWNLEFTFIRE",
        }
    }
}

pub struct Ale {
    inner: *mut atari_env_sys::ALEInterface,
}

impl Drop for Ale {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl Ale {
    pub fn new(rom_path: &Path, config: &AleConfig) -> Result<Self> {
        let rom_path = rom_path
            .to_str()
            .ok_or_else(|| anyhow!("ROM path is not valid UTF-8: {:?}", rom_path))?;
        let rom_path = CString::new(rom_path)?;

        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), config.random_seed);
            atari_env_sys::setBool(ale, c_str!("display_screen").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("sound").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("color_averaging").as_ptr(), false);
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), config.frame_skip);
            atari_env_sys::setFloat(
                ale,
                c_str!("repeat_action_probability").as_ptr(),
                config.repeat_action_probability,
            );
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
            atari_env_sys::reset_game(ale);
        }

        Ok(Self { inner: ale })
    }

    pub fn minimal_actions(&self) -> Result<Vec<AleAction>> {
        let n = unsafe { atari_env_sys::getMinimalActionSize(self.inner) } as usize;
        let mut buf = vec![0i32; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(self.inner, buf.as_mut_ptr());
        }
        buf.into_iter()
            .map(|a| AleAction::from_i32(a).ok_or_else(|| anyhow!("Unknown ALE action {}", a)))
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        unsafe { atari_env_sys::game_over(self.inner) }
    }

    pub fn reset(&mut self) {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
    }

    /// Returns the reward.
    pub fn take_action(&mut self, action: AleAction) -> i32 {
        let ret: ::std::os::raw::c_int = unsafe { atari_env_sys::act(self.inner, action as i32) };
        ret.into()
    }

    pub fn lives(&self) -> u32 {
        unsafe { atari_env_sys::lives(self.inner) as u32 }
    }

    pub fn width(&self) -> u32 {
        unsafe { atari_env_sys::getScreenWidth(self.inner) as u32 }
    }

    pub fn height(&self) -> u32 {
        unsafe { atari_env_sys::getScreenHeight(self.inner) as u32 }
    }

    /// Always rgb regardless of endianness.
    pub fn rgb24(&self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len(), (self.width() * self.height() * 3) as usize);
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
    }
}
