//! Optimizers.
use crate::util::clamp_grads;
use anyhow::Result;
use candle_core::{backprop::GradStore, Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of optimizer for training the action-value network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// AdamW optimizer.
    AdamW {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_weight_decay")]
        /// Weight decay.
        weight_decay: f64,
    },
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Constructs the optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                let opt = Adam::new(vars.clone(), params)?;
                Ok(Optimizer::Adam(opt, vars))
            }
            OptimizerConfig::AdamW { lr, weight_decay } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    weight_decay: *weight_decay,
                    ..ParamsAdamW::default()
                };
                let opt = AdamW::new(vars.clone(), params)?;
                Ok(Optimizer::AdamW(opt, vars))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::Adam { .. } => Self::Adam { lr },
            Self::AdamW { weight_decay, .. } => Self::AdamW { lr, weight_decay },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-4 }
    }
}

/// Optimizers, holding the variables they update.
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam, Vec<Var>),

    /// AdamW optimizer.
    AdamW(AdamW, Vec<Var>),
}

impl Optimizer {
    fn vars(&self) -> &[Var] {
        match self {
            Self::Adam(_, vars) => vars,
            Self::AdamW(_, vars) => vars,
        }
    }

    /// Applies a backward step pass.
    ///
    /// If `clip` is given, every gradient element is clamped to
    /// `[-clip, clip]` before the update.
    pub fn backward_step(&mut self, loss: &Tensor, clip: Option<f64>) -> Result<()> {
        let mut grads = loss.backward()?;
        if let Some(clip) = clip {
            clamp_grads(&mut grads, self.vars(), clip)?;
        }
        self.step(&grads)
    }

    /// Updates the variables with the given gradients.
    pub fn step(&mut self, grads: &GradStore) -> Result<()> {
        match self {
            Self::Adam(opt, _) => Ok(opt.step(grads)?),
            Self::AdamW(opt, _) => Ok(opt.step(grads)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    #[test]
    fn test_serde_optimizer_config() -> Result<()> {
        let config = OptimizerConfig::default();
        assert_eq!(config, OptimizerConfig::Adam { lr: 1e-4 });

        let yaml = serde_yaml::to_string(&config.learning_rate(3e-4))?;
        let config_: OptimizerConfig = serde_yaml::from_str(&yaml)?;
        assert_eq!(config_, OptimizerConfig::Adam { lr: 3e-4 });
        Ok(())
    }

    #[test]
    fn test_backward_step_moves_towards_minimum() -> Result<()> {
        for config in [
            OptimizerConfig::Adam { lr: 0.1 },
            OptimizerConfig::AdamW {
                lr: 0.1,
                weight_decay: 0.0,
            },
        ] {
            let w = Var::zeros(1, DType::F32, &Device::Cpu)?;
            let mut opt = config.build(vec![w.clone()])?;
            for _ in 0..10 {
                let loss = (w.as_tensor() - 1.0)?.sqr()?.sum_all()?;
                opt.backward_step(&loss, Some(1.0))?;
            }
            let v = w.as_tensor().to_vec1::<f32>()?[0];
            assert!(v > 0.5 && v < 1.5, "{}", v);
        }
        Ok(())
    }
}
