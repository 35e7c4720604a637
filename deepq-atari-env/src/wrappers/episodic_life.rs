use anyhow::Result;
use deepq_core::{record::RecordValue, Env, Step};
use log::trace;

/// Ends an episode on the loss of a life, but resets the game only when it
/// is really over.
///
/// All states stay reachable, while value estimation sees a terminal state at
/// every life loss. [`Step::info`] carries `real_done`, `1` if the inner game
/// ended.
pub struct EpisodicLife<E: Env> {
    inner: E,
    lives: usize,
    was_real_done: bool,
    was_real_reset: bool,
}

impl<E: Env> EpisodicLife<E> {
    /// Wraps `inner`.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            lives: 0,
            was_real_done: true,
            was_real_reset: false,
        }
    }

    /// Whether the last step ended the game.
    pub fn was_real_done(&self) -> bool {
        self.was_real_done
    }

    /// Whether the last reset reset the game.
    pub fn was_real_reset(&self) -> bool {
        self.was_real_reset
    }
}

impl<E: Env> Env for EpisodicLife<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<E::Obs> {
        let obs = if self.was_real_done {
            self.was_real_reset = true;
            self.inner.reset()?
        } else {
            // Advance from the state of the lost life
            let step = self.inner.step(0)?;
            if step.is_done {
                self.was_real_reset = true;
                self.inner.reset()?
            } else {
                self.was_real_reset = false;
                step.obs
            }
        };
        self.was_real_done = false;
        self.lives = self.inner.lives();
        Ok(obs)
    }

    fn step(&mut self, act: usize) -> Result<Step<E::Obs>> {
        let mut step = self.inner.step(act)?;
        self.was_real_done = step.is_done;
        let lives = self.inner.lives();
        if lives < self.lives && lives > 0 {
            trace!("Life lost, {} remaining", lives);
            step.is_done = true;
        }
        self.lives = lives;
        step.info.insert(
            "real_done",
            RecordValue::Scalar(if self.was_real_done { 1.0 } else { 0.0 }),
        );
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
