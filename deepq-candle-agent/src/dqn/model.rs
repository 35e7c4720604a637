use crate::{
    model::SubModel,
    opt::{Optimizer, OptimizerConfig},
    util::copy_params,
};
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<C> {
    pub(super) q_config: C,
    #[serde(default)]
    pub(super) opt_config: OptimizerConfig,
}

impl<C> DqnModelConfig<C> {
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: C) -> Self {
        self.q_config = v;
        self
    }

    /// Returns configurations for action-value function.
    pub fn get_q_config(&self) -> &C {
        &self.q_config
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }
}

/// Action-value function with its parameters and optimizer.
pub struct DqnModel<Q>
where
    Q: SubModel,
{
    varmap: VarMap,

    // Action-value function
    q: Q,

    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel,
{
    /// Constructs [`DqnModel`].
    pub fn build(config: DqnModelConfig<Q::Config>, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
            Q::build(vb, config.q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self { varmap, q, opt })
    }

    /// Outputs the action-value given observation(s).
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.q.forward(xs)
    }

    /// Returns the action-value function.
    pub fn q(&self) -> &Q {
        &self.q
    }

    /// Backpropagates `loss` and updates the parameters.
    pub fn backward_step(&mut self, loss: &Tensor, clip: Option<f64>) -> Result<()> {
        self.opt.backward_step(loss, clip)
    }

    /// Returns the parameters.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Overwrites the parameters with a copy of the parameters of `src`.
    pub fn copy_from(&self, src: &Self) -> Result<()> {
        copy_params(&self.varmap, &src.varmap)
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters saved by [`DqnModel::save`].
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load dqnmodel from {:?}", path.as_ref());
        Ok(())
    }
}
