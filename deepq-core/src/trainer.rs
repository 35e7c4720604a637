//! Train [`Agent`].
mod config;
mod history;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    replay_buffer::Transition,
    Agent, Env, ExperienceBufferBase, ReplayBufferBase,
};
use anyhow::Result;
pub use config::TrainerConfig;
pub use history::RewardHistory;
use log::{debug, info, warn};
use std::{marker::PhantomData, path::Path};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episode loop of DQN training.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], an environment, a replay buffer
///    and a recorder implementing [`Recorder`].
///    * Reset a counter of the environment steps: `env_steps = 0`
/// 1. For each of `n_episodes` episodes, reset [`Env`] and take the observation
///    as the current state.
/// 2. The agent selects an action for the state. In training mode this is
///    epsilon-greedy.
/// 3. Step the environment, accumulate the reward, optionally render.
/// 4. Push the transition `(state, action, next_state, reward)` into the replay
///    buffer, with `next_state = None` if the episode ended.
/// 5. `env_steps += 1`
/// 6. If `env_steps > initial_memory`:
///     1. Do an optimization step for the agent.
///     2. If `env_steps % target_update == 0`, copy the policy network into
///        the target network.
/// 7. If the episode ended, record its reward and go to 1, otherwise go to 2.
/// 8. Every `log_interval` episodes, log the mean reward of the last
///    `log_interval` episodes and keep it in the returned [`RewardHistory`].
///
/// After the last episode the environment is closed and, if `model_dir` is
/// given, the agent is saved there.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|action|B[Env]
///     B -->|"Step&lt;Obs&gt;"|C[Trainer]
///     C -->|Transition|D[ReplayBuffer]
///     D -->|TransitionBatch|A
/// ```
pub struct Trainer<E, R>
where
    E: Env,
    R: ExperienceBufferBase<Item = Transition<E::Obs>> + ReplayBufferBase,
{
    /// The number of training episodes.
    n_episodes: usize,

    /// Environment steps before the first optimization step.
    initial_memory: usize,

    /// Interval of target synchronization in environment steps.
    target_update: usize,

    /// Interval of logging in episodes.
    log_interval: usize,

    render: bool,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Environment steps taken so far.
    env_steps: usize,

    phantom: PhantomData<(E, R)>,
}

impl<E, R> Trainer<E, R>
where
    E: Env,
    R: ExperienceBufferBase<Item = Transition<E::Obs>> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            n_episodes: config.n_episodes,
            initial_memory: config.initial_memory,
            target_update: config.target_update.max(1),
            log_interval: config.log_interval.max(1),
            render: config.render,
            model_dir: config.model_dir,
            env_steps: 0,
            phantom: PhantomData,
        }
    }

    /// Returns the number of environment steps taken so far.
    pub fn env_steps(&self) -> usize {
        self.env_steps
    }

    /// Performs a training step.
    ///
    /// Takes one environment step from `state`, pushes the transition into
    /// `buffer` and, past the warmup period, does an optimization step.
    /// Returns the step's reward, the next state (`None` at the end of an
    /// episode) and the record of the optimization step, if any.
    pub fn train_step<A>(
        &mut self,
        agent: &mut A,
        env: &mut E,
        buffer: &mut R,
        state: E::Obs,
    ) -> Result<(f32, Option<E::Obs>, Option<Record>)>
    where
        A: Agent<E, R>,
    {
        let action = agent.sample(&state)?;
        if self.render {
            env.render()?;
        }
        let step = env.step(action)?;
        let reward = step.reward;
        let next_state = if step.is_done { None } else { Some(step.obs) };

        buffer.push(Transition::new(state, action, next_state.clone(), reward))?;
        self.env_steps += 1;

        let mut record = None;
        if self.env_steps > self.initial_memory {
            record = agent.opt(buffer)?;

            if self.env_steps % self.target_update == 0 {
                agent.sync_target()?;
                debug!("Synchronized the target network at step {}", self.env_steps);
            }
        }

        Ok((reward, next_state, record))
    }

    /// Train the agent.
    pub fn train<A>(
        &mut self,
        agent: &mut A,
        env: &mut E,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<RewardHistory>
    where
        A: Agent<E, R>,
    {
        let mut history = RewardHistory::default();
        agent.train();

        for episode in 0..self.n_episodes {
            let mut state = env.reset()?;
            let mut total_reward = 0f32;
            let mut episode_len = 0usize;
            let mut last_loss = None;

            loop {
                let (reward, next_state, record) = self.train_step(agent, env, buffer, state)?;
                total_reward += reward;
                episode_len += 1;
                if let Some(loss) = record.and_then(|r| r.get_scalar("loss").ok()) {
                    last_loss = Some(loss);
                }

                match next_state {
                    Some(s) => state = s,
                    None => break,
                }
            }

            history.push_episode(total_reward);
            let mut record = Record::from_slice(&[
                ("episode", Scalar(episode as f32)),
                ("reward", Scalar(total_reward)),
                ("episode_len", Scalar(episode_len as f32)),
                ("env_steps", Scalar(self.env_steps as f32)),
            ]);
            if let Some(loss) = last_loss {
                record.insert("loss", Scalar(loss));
            }
            recorder.write(record)?;

            if episode % self.log_interval == 0 {
                if let Some(mean) = history.log_point(episode, self.log_interval) {
                    info!(
                        "Total steps: {} \t Episode: {}/{} \t Mean reward: {}",
                        self.env_steps, episode, episode_len, mean
                    );
                }
            }
        }

        env.close()?;
        recorder.flush()?;

        if let Some(model_dir) = &self.model_dir {
            match agent.save_params(Path::new(model_dir)) {
                Ok(()) => info!("Saved the model in {:?}.", model_dir),
                Err(e) => {
                    warn!("Failed to save model in {:?}.", model_dir);
                    return Err(e);
                }
            }
        }

        Ok(history)
    }
}
