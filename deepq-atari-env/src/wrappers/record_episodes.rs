use crate::Frame;
use anyhow::{Context, Result};
use deepq_core::{Env, Step};
use image::{GrayImage, RgbImage};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Saves every frame as a PNG image.
///
/// Frames of the `n`-th episode go to `<dir>/episode_NNNNNN/frame_NNNNNN.png`.
/// An episode starts at each reset of the inner environment.
pub struct RecordEpisodes<E: Env<Obs = Frame>> {
    inner: E,
    dir: PathBuf,
    episode: Option<usize>,
    frame: usize,
}

impl<E: Env<Obs = Frame>> RecordEpisodes<E> {
    /// Wraps `inner`, recording frames under `dir`.
    pub fn new(inner: E, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
        info!("Recording episodes in {:?}", dir);
        Ok(Self {
            inner,
            dir,
            episode: None,
            frame: 0,
        })
    }

    /// Directory of the current episode.
    pub fn episode_dir(&self) -> Option<PathBuf> {
        self.episode
            .map(|e| self.dir.join(format!("episode_{:06}", e)))
    }

    fn save(&mut self, obs: &Frame) -> Result<()> {
        let dir = match self.episode_dir() {
            Some(dir) => dir,
            None => return Ok(()),
        };
        let path = dir.join(format!("frame_{:06}.png", self.frame));
        save_png(obs, &path)?;
        self.frame += 1;
        Ok(())
    }
}

/// Writes an RGB or grayscale frame as a PNG image.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    let (h, w, c) = frame.dim();
    let raw = frame.as_standard_layout().iter().copied().collect::<Vec<_>>();
    let res = match c {
        3 => RgbImage::from_raw(w as u32, h as u32, raw).map(|img| img.save(path)),
        1 => GrayImage::from_raw(w as u32, h as u32, raw).map(|img| img.save(path)),
        _ => None,
    };
    match res {
        Some(r) => r.with_context(|| format!("Failed to save {:?}", path)),
        None => Err(deepq_core::error::DeepqError::ObservationShape {
            expected: vec![h, w, 3],
            found: vec![h, w, c],
        }
        .into()),
    }
}

impl<E: Env<Obs = Frame>> Env for RecordEpisodes<E> {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        let obs = self.inner.reset()?;
        let episode = self.episode.map_or(0, |e| e + 1);
        self.episode = Some(episode);
        self.frame = 0;
        if let Some(dir) = self.episode_dir() {
            fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }
        self.save(&obs)?;
        Ok(obs)
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        let step = self.inner.step(act)?;
        self.save(&step.obs)?;
        Ok(step)
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
    use crate::util::test::ScriptedSimulator;
    use ndarray::Array3;
    use tempdir::TempDir;

    #[test]
    fn test_writes_frames_per_episode() -> Result<()> {
        let dir = TempDir::new("record_episodes")?;
        let sim = ScriptedSimulator::default()
            .episode_len(3)
            .frames(|t| Array3::from_elem((6, 4, 3), t as u8));
        let mut env = RecordEpisodes::new(sim, dir.path())?;

        for _ in 0..2 {
            env.reset()?;
            while !env.step(0)?.is_done {}
        }

        for e in 0..2 {
            let ep = dir.path().join(format!("episode_{:06}", e));
            assert_eq!(fs::read_dir(&ep)?.count(), 4);
        }
        let img = image::open(dir.path().join("episode_000001/frame_000002.png"))?.to_rgb8();
        assert_eq!(img.dimensions(), (4, 6));
        assert_eq!(img.get_pixel(0, 0).0, [2, 2, 2]);
        Ok(())
    }
}
