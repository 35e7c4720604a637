use crate::Frame;
use anyhow::Result;
use deepq_core::{error::DeepqError, Env, Step};
use image::{
    imageops::{resize, FilterType::Triangle},
    ImageBuffer, Luma,
};
use ndarray::Array3;

/// Converts an RGB frame to grayscale and resizes it bilinearly.
///
/// The luminance is `0.299 R + 0.587 G + 0.114 B`. The output has shape
/// `(height, width, 1)`.
pub fn warp(frame: &Frame, width: usize, height: usize) -> Result<Frame> {
    let shape = frame.shape();
    if shape[2] != 3 {
        return Err(DeepqError::ObservationShape {
            expected: vec![shape[0], shape[1], 3],
            found: shape.to_vec(),
        }
        .into());
    }
    let (h, w) = (shape[0] as u32, shape[1] as u32);

    let gray = ImageBuffer::<Luma<u8>, Vec<u8>>::from_fn(w, h, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let r = frame[[y, x, 0]] as f32;
        let g = frame[[y, x, 1]] as f32;
        let b = frame[[y, x, 2]] as f32;
        let l = 0.299 * r + 0.587 * g + 0.114 * b;
        Luma([l.round().min(255.0) as u8])
    });
    let img = resize(&gray, width as u32, height as u32, Triangle);

    Ok(Array3::from_shape_vec((height, width, 1), img.into_raw())?)
}

/// Warps frames to 84x84 grayscale as in the Nature DQN paper.
pub struct WarpFrame<E: Env<Obs = Frame>> {
    inner: E,
    width: usize,
    height: usize,
}

impl<E: Env<Obs = Frame>> WarpFrame<E> {
    /// Wraps `inner`, warping frames to 84x84.
    pub fn new(inner: E) -> Self {
        Self::with_size(inner, 84, 84)
    }

    /// Wraps `inner`, warping frames to the given size.
    pub fn with_size(inner: E, width: usize, height: usize) -> Self {
        Self {
            inner,
            width,
            height,
        }
    }
}

impl<E: Env<Obs = Frame>> Env for WarpFrame<E> {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        let obs = self.inner.reset()?;
        warp(&obs, self.width, self.height)
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        let step = self.inner.step(act)?;
        let obs = warp(&step.obs, self.width, self.height)?;
        Ok(step.map_obs(|_| obs))
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
