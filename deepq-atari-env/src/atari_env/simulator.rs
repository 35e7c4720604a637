use super::{
    ale::{Ale, AleAction},
    AleConfig,
};
use crate::Frame;
use anyhow::{anyhow, Context, Result};
use deepq_core::{
    record::{Record, RecordValue},
    Env, Step,
};
use image::{DynamicImage, RgbImage};
use log::info;
use ndarray::Array3;

/// The Arcade Learning Environment as an [`Env`] emitting raw RGB frames.
///
/// Actions are indices into the minimal action set of the game. Sticky
/// actions are disabled and every step is a single emulator frame, leaving
/// frame skipping to [`MaxAndSkip`](crate::wrappers::MaxAndSkip).
pub struct AleSimulator {
    ale: Ale,
    actions: Vec<AleAction>,
    height: usize,
    width: usize,
}

impl AleSimulator {
    /// Loads the ROM of the configured game.
    pub fn new(config: &AleConfig) -> Result<Self> {
        let rom = config
            .rom_file()
            .ok_or_else(|| anyhow!("Neither ATARI_ROM_DIR nor a home directory is set"))?;
        if !rom.exists() {
            return Err(anyhow!("ROM file {:?} not found", rom));
        }
        let ale = Ale::new(&rom, config).with_context(|| format!("Failed to load {:?}", rom))?;
        let actions = ale.minimal_actions()?;
        let (height, width) = (ale.height() as usize, ale.width() as usize);
        info!("Loaded {:?} ({}x{}, {} actions)", rom, width, height, actions.len());

        Ok(Self {
            ale,
            actions,
            height,
            width,
        })
    }

    fn screen(&self) -> Result<Frame> {
        let mut buf = vec![0u8; self.height * self.width * 3];
        self.ale.rgb24(&mut buf);
        Ok(Array3::from_shape_vec((self.height, self.width, 3), buf)?)
    }
}

impl Env for AleSimulator {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        self.ale.reset();
        self.screen()
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        let action = *self
            .actions
            .get(act)
            .ok_or_else(|| anyhow!("Action {} out of range ({} actions)", act, self.actions.len()))?;
        let reward = self.ale.take_action(action) as f32;
        let is_done = self.ale.is_game_over();
        let info = Record::from_slice(&[("lives", RecordValue::Scalar(self.lives() as f32))]);
        Ok(Step::new(self.screen()?, reward, is_done, info))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.meaning().to_string()).collect()
    }

    fn lives(&self) -> usize {
        self.ale.lives() as usize
    }

    /// Prints the screen to the terminal.
    fn render(&mut self) -> Result<()> {
        let (w, h) = (self.width as u32, self.height as u32);
        let buf = self.screen()?.into_raw_vec();
        let img = RgbImage::from_raw(w, h, buf).ok_or_else(|| anyhow!("Invalid screen buffer"))?;
        let conf = viuer::Config {
            width: Some(80),
            ..Default::default()
        };
        viuer::print(&DynamicImage::ImageRgb8(img), &conf)?;
        Ok(())
    }
}
