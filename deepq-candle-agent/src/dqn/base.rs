//! DQN agent implemented with candle.
use super::{config::DqnConfig, explorer::EpsilonGreedy, model::DqnModel};
use crate::{cnn::Cnn, util::smooth_l1_loss, ObsTensor};
use anyhow::Result;
use candle_core::{shape::D, Device, Tensor};
use deepq_core::{
    record::{Record, RecordValue},
    replay_buffer::ReplayBuffer,
    Agent, Configurable, Env, Policy, ReplayBufferBase,
};
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{convert::TryFrom, fs, marker::PhantomData, path::Path};

/// Name of the directory of the full model: agent configuration and weights.
pub const MODEL_DIR_NAME: &str = "dqn_pong_model";

/// File name of the weights-only snapshot.
pub const CHECKPOINT_FILE: &str = "checkpoint1.safetensors";

const CONFIG_FILE: &str = "config.yaml";
const MODEL_FILE: &str = "model.safetensors";

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The agent holds a policy network and a target network. The target
/// network is a verbatim copy of the policy network, taken at construction
/// and at every [`Agent::sync_target`].
pub struct Dqn<E>
where
    E: Env,
    E::Obs: ObsTensor,
{
    config: DqnConfig,
    qnet: DqnModel<Cnn>,
    qnet_tgt: DqnModel<Cnn>,
    explorer: EpsilonGreedy,
    batch_size: usize,
    discount_factor: f64,
    clip_grad: Option<f64>,
    n_actions: usize,
    n_opts: usize,
    train: bool,
    device: Device,
    rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E> Dqn<E>
where
    E: Env,
    E::Obs: ObsTensor,
{
    fn update_critic(&mut self, buffer: &mut ReplayBuffer<E::Obs>) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let n = batch.len();

        let pred = {
            let states = batch.states.iter().collect::<Vec<_>>();
            let obs = <E::Obs as ObsTensor>::to_tensor_batch(&states, &self.device)?;
            let act = batch.actions.iter().map(|a| *a as u32).collect::<Vec<_>>();
            let act = Tensor::from_vec(act, (n, 1), &self.device)?;
            self.qnet.forward(&obs)?.gather(&act, 1)?.squeeze(1)?
        };

        // max_a' Q_target(s', a') for non-terminal next states, 0 otherwise
        let next_values = {
            let mut next_values = vec![0f32; n];
            let next_states = batch.non_final_next_states();
            if !next_states.is_empty() {
                let obs = <E::Obs as ObsTensor>::to_tensor_batch(&next_states, &self.device)?;
                let q = self
                    .qnet_tgt
                    .forward(&obs)?
                    .max(D::Minus1)?
                    .detach()
                    .to_vec1::<f32>()?;
                let ixs = batch
                    .non_final_mask()
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, m)| if m { Some(i) } else { None });
                for (i, q) in ixs.zip(q) {
                    next_values[i] = q;
                }
            }
            Tensor::from_vec(next_values, (n,), &self.device)?
        };

        let tgt = {
            let reward = Tensor::from_slice(&batch.rewards[..], (n,), &self.device)?;
            (reward + (next_values * self.discount_factor)?)?
        };

        let loss = smooth_l1_loss(&pred, &tgt)?;
        self.qnet.backward_step(&loss, self.clip_grad)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn greedy(&self, obs: &E::Obs) -> Result<usize> {
        let obs = <E::Obs as ObsTensor>::to_tensor_batch(&[obs], &self.device)?;
        let q = self.qnet.forward(&obs)?.detach();
        let a = q.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;
        Ok(a as usize)
    }

    /// Returns the hidden features and the action values of an observation.
    pub fn features(&self, obs: &E::Obs) -> Result<(Vec<f32>, Vec<f32>)> {
        let obs = <E::Obs as ObsTensor>::to_tensor_batch(&[obs], &self.device)?;
        let cnn = self.qnet.q();
        let features = cnn.features(&obs)?.detach();
        let q = self.qnet.forward(&obs)?.detach();
        Ok((
            features.squeeze(0)?.to_vec1::<f32>()?,
            q.squeeze(0)?.to_vec1::<f32>()?,
        ))
    }

    /// The policy network.
    pub fn policy_model(&self) -> &DqnModel<Cnn> {
        &self.qnet
    }

    /// The target network.
    pub fn target_model(&self) -> &DqnModel<Cnn> {
        &self.qnet_tgt
    }

    /// The exploration schedule.
    pub fn explorer(&self) -> &EpsilonGreedy {
        &self.explorer
    }

    /// The number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Builds the agent from a directory written by [`Agent::save_params`].
    pub fn load_from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut agent = Self::build_from_path(path.join(MODEL_DIR_NAME).join(CONFIG_FILE))?;
        agent.load_params(path)?;
        Ok(agent)
    }
}

impl<E> Configurable<E> for Dqn<E>
where
    E: Env,
    E::Obs: ObsTensor,
{
    type Config = DqnConfig;

    /// Constructs DQN agent.
    fn build(config: Self::Config) -> Result<Self> {
        let device = candle_core::Device::try_from(config.device)?;
        let qnet = DqnModel::build(config.model_config.clone(), &device)?;
        let qnet_tgt = DqnModel::build(config.model_config.clone(), &device)?;
        qnet_tgt.copy_from(&qnet)?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            clip_grad: config.clip_grad,
            explorer: config.explorer.clone(),
            n_actions: config.get_q_config().get_n_actions(),
            n_opts: 0,
            train: false,
            device,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
            config,
        })
    }
}

impl<E> Policy<E> for Dqn<E>
where
    E: Env,
    E::Obs: ObsTensor,
{
    /// In training mode, takes a random action with the probability of the
    /// exploration schedule. In evaluation mode, always greedy.
    fn sample(&mut self, obs: &E::Obs) -> Result<usize> {
        if self.train && self.explorer.explore(&mut self.rng) {
            Ok(self.rng.gen_range(0..self.n_actions))
        } else {
            self.greedy(obs)
        }
    }
}

impl<E> Agent<E, ReplayBuffer<E::Obs>> for Dqn<E>
where
    E: Env,
    E::Obs: ObsTensor,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut ReplayBuffer<E::Obs>) -> Result<Option<Record>> {
        if buffer.n_samples() < self.batch_size {
            return Ok(None);
        }

        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;

        Ok(Some(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            (
                "eps",
                RecordValue::Scalar(self.explorer.eps_threshold() as f32),
            ),
        ])))
    }

    fn sync_target(&mut self) -> Result<()> {
        self.qnet_tgt.copy_from(&self.qnet)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        let model_dir = path.join(MODEL_DIR_NAME);
        fs::create_dir_all(&model_dir)?;
        self.config.save(model_dir.join(CONFIG_FILE))?;
        self.qnet.save(model_dir.join(MODEL_FILE))?;
        self.qnet.save(path.join(CHECKPOINT_FILE))?;
        info!("Saved DQN agent in {:?}", path);
        Ok(())
    }

    /// Loads the full model if present, otherwise the weights-only snapshot.
    /// The target network is synchronized with the loaded weights.
    fn load_params(&mut self, path: &Path) -> Result<()> {
        let full = path.join(MODEL_DIR_NAME).join(MODEL_FILE);
        if full.exists() {
            self.qnet.load(&full)?;
        } else {
            self.qnet.load(path.join(CHECKPOINT_FILE))?;
        }
        self.sync_target()
    }
}
