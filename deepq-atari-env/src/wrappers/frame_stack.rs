use crate::{Frame, LazyFrames};
use anyhow::Result;
use deepq_core::{Env, Step};
use std::{collections::VecDeque, sync::Arc};

/// Stacks the last `k` frames into a [`LazyFrames`] observation.
///
/// On reset the stack is filled with `k` copies of the reset frame.
pub struct FrameStack<E: Env<Obs = Frame>> {
    inner: E,
    k: usize,
    frames: VecDeque<Arc<Frame>>,
}

impl<E: Env<Obs = Frame>> FrameStack<E> {
    /// Wraps `inner`.
    pub fn new(inner: E, k: usize) -> Self {
        let k = k.max(1);
        Self {
            inner,
            k,
            frames: VecDeque::with_capacity(k),
        }
    }

    fn observation(&self) -> Result<LazyFrames> {
        debug_assert_eq!(self.frames.len(), self.k);
        LazyFrames::new(self.frames.iter().cloned().collect())
    }
}

impl<E: Env<Obs = Frame>> Env for FrameStack<E> {
    type Obs = LazyFrames;

    fn reset(&mut self) -> Result<LazyFrames> {
        let frame = Arc::new(self.inner.reset()?);
        self.frames.clear();
        for _ in 0..self.k {
            self.frames.push_back(frame.clone());
        }
        self.observation()
    }

    fn step(&mut self, act: usize) -> Result<Step<LazyFrames>> {
        let step = self.inner.step(act)?;
        if self.frames.len() == self.k {
            self.frames.pop_front();
        }
        let Step {
            obs,
            reward,
            is_done,
            info,
        } = step;
        self.frames.push_back(Arc::new(obs));
        Ok(Step::new(self.observation()?, reward, is_done, info))
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

    fn small_sim() -> ScriptedSimulator {
        ScriptedSimulator::default().frames(|t| Array3::from_elem((2, 2, 1), t as u8))
    }

    #[test]
    fn test_reset_fills_stack() -> Result<()> {
        let mut env = FrameStack::new(small_sim(), 4);
        let obs = env.reset()?;
        assert_eq!(obs.shape(), [2, 2, 4]);
        assert!(obs.force().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_keeps_last_k_frames() -> Result<()> {
        let mut env = FrameStack::new(small_sim(), 4);
        env.reset()?;
        let mut prev: Option<LazyFrames> = None;
        for _ in 0..5 {
            let obs = env.step(0)?.obs;
            if let Some(p) = prev.replace(obs.clone()) {
                // Consecutive stacks share frames
                let (p, o) = (p.frames().unwrap(), obs.frames().unwrap());
                assert!(Arc::ptr_eq(&p[1], &o[0]));
            }
        }
        let obs = prev.unwrap();
        let channels: Vec<u8> = (0..4).map(|c| obs.force()[[0, 0, c]]).collect();
        assert_eq!(channels, vec![2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_single_frame() -> Result<()> {
        let mut env = FrameStack::new(small_sim(), 1);
        env.reset()?;
        let obs = env.step(0)?.obs;
        assert_eq!(obs.shape(), [2, 2, 1]);
        assert_eq!(obs.force()[[1, 1, 0]], 1);
        Ok(())
    }
}
