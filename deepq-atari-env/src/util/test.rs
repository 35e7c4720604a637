//! Utilities for test.
//!
//! [`ScriptedSimulator`] follows the simulator contract without the Arcade
//! Learning Environment: rewards, frames, life losses and the end of the game
//! are given by a script.
use crate::Frame;
use anyhow::Result;
use deepq_core::{
    record::{Record, RecordValue},
    Env, Step,
};
use ndarray::Array3;

/// Height of the raw frames of [`ScriptedSimulator`].
pub const HEIGHT: usize = 210;

/// Width of the raw frames of [`ScriptedSimulator`].
pub const WIDTH: usize = 160;

/// Action meanings of Pong's minimal action set.
pub fn pong_actions() -> Vec<String> {
    ["NOOP", "FIRE", "RIGHT", "LEFT", "RIGHTFIRE", "LEFTFIRE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A uniform raw frame filled with `v`.
pub fn uniform_frame(v: u8) -> Frame {
    Array3::from_elem((HEIGHT, WIDTH, 3), v)
}

type FrameFn = Box<dyn Fn(usize) -> Frame>;
type RewardFn = Box<dyn Fn(usize, usize) -> f32>;

/// A deterministic simulator driven by a script.
///
/// Frame number `t` counts the steps since the last reset, the reset frame
/// being `t = 0`. By default the frame at `t` is filled with `t % 256` and
/// every step gives reward `1`.
pub struct ScriptedSimulator {
    action_meanings: Vec<String>,
    episode_len: usize,
    initial_lives: usize,
    life_loss_at: Vec<usize>,
    frame_fn: FrameFn,
    reward_fn: RewardFn,

    t: usize,
    lives: usize,
    n_resets: usize,
    n_closes: usize,
    actions: Vec<usize>,
}

impl Default for ScriptedSimulator {
    fn default() -> Self {
        Self {
            action_meanings: pong_actions(),
            episode_len: 1000,
            initial_lives: 1,
            life_loss_at: vec![],
            frame_fn: Box::new(|t| uniform_frame((t % 256) as u8)),
            reward_fn: Box::new(|_t, _act| 1.0),
            t: 0,
            lives: 1,
            n_resets: 0,
            n_closes: 0,
            actions: vec![],
        }
    }
}

impl ScriptedSimulator {
    /// Sets the action meanings.
    pub fn action_meanings<S: Into<String> + Clone>(mut self, meanings: &[S]) -> Self {
        self.action_meanings = meanings.iter().cloned().map(Into::into).collect();
        self
    }

    /// The game is over after `n` steps.
    pub fn episode_len(mut self, n: usize) -> Self {
        self.episode_len = n;
        self
    }

    /// Sets the number of lives at reset and the frame numbers at which a
    /// life is lost.
    pub fn lives(mut self, initial: usize, loss_at: &[usize]) -> Self {
        self.initial_lives = initial;
        self.lives = initial;
        self.life_loss_at = loss_at.to_vec();
        self
    }

    /// Sets the frame emitted at each frame number.
    pub fn frames(mut self, f: impl Fn(usize) -> Frame + 'static) -> Self {
        self.frame_fn = Box::new(f);
        self
    }

    /// Sets the reward as a function of the frame number and the action.
    pub fn rewards(mut self, f: impl Fn(usize, usize) -> f32 + 'static) -> Self {
        self.reward_fn = Box::new(f);
        self
    }

    /// The number of resets so far.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }

    /// The number of calls of [`Env::close`].
    pub fn n_closes(&self) -> usize {
        self.n_closes
    }

    /// Actions taken so far, across episodes.
    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    /// The current frame number.
    pub fn t(&self) -> usize {
        self.t
    }
}

impl Env for ScriptedSimulator {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        self.t = 0;
        self.lives = self.initial_lives;
        self.n_resets += 1;
        Ok((self.frame_fn)(0))
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        self.t += 1;
        self.actions.push(act);
        if self.life_loss_at.contains(&self.t) {
            self.lives = self.lives.saturating_sub(1);
        }
        let is_done = self.t >= self.episode_len || self.lives == 0;
        let reward = (self.reward_fn)(self.t, act);
        let info = Record::from_slice(&[("lives", RecordValue::Scalar(self.lives as f32))]);
        Ok(Step::new((self.frame_fn)(self.t), reward, is_done, info))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.action_meanings.clone()
    }

    fn lives(&self) -> usize {
        self.lives
    }

    fn close(&mut self) -> Result<()> {
        self.n_closes += 1;
        Ok(())
    }
}

/// Shares a [`ScriptedSimulator`] between a wrapper chain and the test
/// inspecting it.
#[derive(Clone)]
pub struct SharedSimulator(pub std::rc::Rc<std::cell::RefCell<ScriptedSimulator>>);

impl SharedSimulator {
    /// Wraps the simulator.
    pub fn new(sim: ScriptedSimulator) -> Self {
        Self(std::rc::Rc::new(std::cell::RefCell::new(sim)))
    }

    /// Borrows the simulator.
    pub fn get(&self) -> std::cell::Ref<ScriptedSimulator> {
        self.0.borrow()
    }
}

impl Env for SharedSimulator {
    type Obs = Frame;

    fn reset(&mut self) -> Result<Frame> {
        self.0.borrow_mut().reset()
    }

    fn step(&mut self, act: usize) -> Result<Step<Frame>> {
        self.0.borrow_mut().step(act)
    }

    fn action_meanings(&self) -> Vec<String> {
        Env::action_meanings(&*self.0.borrow())
    }

    fn lives(&self) -> usize {
        Env::lives(&*self.0.borrow())
    }

    fn close(&mut self) -> Result<()> {
        self.0.borrow_mut().close()
    }
}
