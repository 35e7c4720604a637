use crate::Frame;
use anyhow::Result;
use deepq_core::{record::Record, Env, Step};
use ndarray::Zip;
use std::collections::VecDeque;

/// Repeats each action `skip` times and returns the element-wise maximum of
/// the last two raw frames.
///
/// Rewards of the repeated steps are summed. The repetition stops early if
/// the game ends.
pub struct MaxAndSkip<E: Env<Obs = Frame>> {
    inner: E,
    skip: usize,
    obs_buffer: VecDeque<Frame>,
}

impl<E: Env<Obs = Frame>> MaxAndSkip<E> {
    /// Wraps `inner`.
    pub fn new(inner: E, skip: usize) -> Self {
        Self {
            inner,
            skip: skip.max(1),
            obs_buffer: VecDeque::with_capacity(2),
        }
    }

    fn push_frame(&mut self, frame: Frame) {
        if self.obs_buffer.len() == 2 {
            self.obs_buffer.pop_front();
        }
        self.obs_buffer.push_back(frame);
    }

    fn max_frame(&self) -> Frame {
        match (self.obs_buffer.front(), self.obs_buffer.back()) {
            (Some(a), Some(b)) if self.obs_buffer.len() == 2 => {
                Zip::from(a).and(b).map_collect(|&x, &y| x.max(y))
            }
            (_, Some(b)) => b.clone(),
            _ => unreachable!("frame buffer is filled on reset and step"),
        }
    }
}

impl<E: Env<Obs = Frame>> Env for MaxAndSkip<E> {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        self.obs_buffer.clear();
        let obs = self.inner.reset()?;
        self.push_frame(obs.clone());
        Ok(obs)
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        let mut total_reward = 0f32;
        let mut is_done = false;
        let mut info = Record::empty();

        for _ in 0..self.skip {
            let step = self.inner.step(act)?;
            self.push_frame(step.obs);
            total_reward += step.reward;
            is_done = step.is_done;
            info = step.info;
            if is_done {
                break;
            }
        }

        Ok(Step::new(self.max_frame(), total_reward, is_done, info))
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
