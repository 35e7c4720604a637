//! Frames and lazily stacked frames.
use anyhow::Result;
use deepq_core::error::DeepqError;
use ndarray::{s, Array3};
use std::sync::{Arc, Mutex, OnceLock};

/// A screen frame with shape `(height, width, channels)`.
///
/// Raw frames of the simulator are `(210, 160, 3)` RGB, preprocessed frames
/// are `(84, 84, 1)` grayscale.
pub type Frame = Array3<u8>;

/// The last `k` frames, concatenated along the channel axis on first access.
///
/// Consecutive observations of [`FrameStack`](crate::wrappers::FrameStack)
/// share their frames, so a replay buffer holding many observations stores
/// each frame once. The concatenated array is computed at most once and
/// shared between clones; the references to the frames are released then.
#[derive(Clone, Debug)]
pub struct LazyFrames {
    shape: [usize; 3],
    n_frames: usize,
    frames: Arc<Mutex<Option<Vec<Arc<Frame>>>>>,
    out: Arc<OnceLock<Array3<u8>>>,
}

impl LazyFrames {
    /// Creates a stack from frames of the same height and width.
    pub fn new(frames: Vec<Arc<Frame>>) -> Result<Self> {
        let first = match frames.first() {
            Some(f) => f.shape().to_vec(),
            None => {
                return Err(DeepqError::ObservationShape {
                    expected: vec![0, 0, 1],
                    found: vec![],
                }
                .into())
            }
        };
        for f in frames.iter().skip(1) {
            if f.shape()[..2] != first[..2] {
                return Err(DeepqError::ObservationShape {
                    expected: first,
                    found: f.shape().to_vec(),
                }
                .into());
            }
        }
        let c = frames.iter().map(|f| f.shape()[2]).sum();

        Ok(Self {
            shape: [first[0], first[1], c],
            n_frames: frames.len(),
            frames: Arc::new(Mutex::new(Some(frames))),
            out: Arc::new(OnceLock::new()),
        })
    }

    /// The stacked frames, oldest first, `None` once the array is computed.
    pub fn frames(&self) -> Option<Vec<Arc<Frame>>> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The number of stacked frames.
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Shape of the concatenated array, computed without materializing it.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Returns `true` if the concatenated array has been computed.
    pub fn is_materialized(&self) -> bool {
        self.out.get().is_some()
    }

    /// The concatenated array with shape `(height, width, k * channels)`.
    pub fn force(&self) -> &Array3<u8> {
        self.out.get_or_init(|| {
            let frames = match self.frames.lock() {
                Ok(mut frames) => frames.take(),
                Err(poisoned) => poisoned.into_inner().take(),
            };
            let [h, w, c] = self.shape;
            let mut out = Array3::zeros((h, w, c));
            let mut c0 = 0;
            for f in frames.unwrap_or_default().iter() {
                let c1 = c0 + f.shape()[2];
                out.slice_mut(s![.., .., c0..c1]).assign(f.as_ref());
                c0 = c1;
            }
            out
        })
    }
}

impl PartialEq for LazyFrames {
    fn eq(&self, other: &Self) -> bool {
        self.force() == other.force()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(v: u8) -> Arc<Frame> {
        Arc::new(Array3::from_elem((2, 3, 1), v))
    }

    #[test]
    fn test_force_concatenates_channels() -> Result<()> {
        let lazy = LazyFrames::new(vec![frame(1), frame(2), frame(3)])?;
        assert_eq!(lazy.shape(), [2, 3, 3]);
        assert!(!lazy.is_materialized());

        let out = lazy.force();
        assert_eq!(out.shape(), &[2, 3, 3]);
        assert_eq!(out[[1, 2, 0]], 1);
        assert_eq!(out[[0, 0, 2]], 3);
        assert!(lazy.is_materialized());
        Ok(())
    }

    #[test]
    fn test_force_releases_frames() -> Result<()> {
        let f = frame(5);
        let lazy = LazyFrames::new(vec![f.clone(), f.clone()])?;
        let cloned = lazy.clone();
        assert_eq!(Arc::strong_count(&f), 3);

        lazy.force();
        assert_eq!(Arc::strong_count(&f), 1);
        assert!(lazy.frames().is_none());
        assert!(cloned.is_materialized());
        assert_eq!(cloned.force()[[0, 0, 1]], 5);
        assert_eq!(lazy.shape(), [2, 3, 2]);
        assert_eq!(lazy.n_frames(), 2);
        Ok(())
    }

    #[test]
    fn test_memoized_across_clones() -> Result<()> {
        let lazy = LazyFrames::new(vec![frame(7), frame(8)])?;
        let cloned = lazy.clone();
        let p1 = lazy.force() as *const Array3<u8>;
        let p2 = cloned.force() as *const Array3<u8>;
        assert_eq!(p1, p2);
        Ok(())
    }

    #[test]
    fn test_mismatched_frames() {
        let other = Arc::new(Array3::from_elem((4, 3, 1), 0u8));
        assert!(LazyFrames::new(vec![frame(1), other]).is_err());
        assert!(LazyFrames::new(vec![]).is_err());
    }
}
