use super::CnnConfig;
use crate::model::SubModel;
use anyhow::{bail, Result};
use candle_core::{DType::F32, Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};

/// Dimension of the hidden feature vector.
pub const FEATURE_DIM: usize = 512;

#[allow(clippy::upper_case_acronyms)]
/// Convolutional neural network, which has the same architecture of the DQN paper.
///
/// Input is a `u8` tensor of shape `(n, in_channels, input_size, input_size)`.
pub struct Cnn {
    n_actions: usize,
    device: Device,
    features: Sequential,
    head: Sequential,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    // Spatial size after the three convolutions
    fn conv_out_size(input_size: usize) -> Option<usize> {
        let o1 = input_size.checked_sub(8)? / 4 + 1;
        let o2 = o1.checked_sub(4)? / 2 + 1;
        let o3 = o2.checked_sub(3)? + 1;
        Some(o3)
    }

    fn create_features(vb: &VarBuilder, in_channels: usize, flat_dim: usize) -> Result<Sequential> {
        let seq = seq()
            .add_fn(|xs| xs.to_dtype(F32)? / 255.0)
            .add(conv2d(in_channels, 32, 8, Self::stride(4), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(32, 64, 4, Self::stride(2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(64, 64, 3, Self::stride(1), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1))
            .add(linear(flat_dim, FEATURE_DIM, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu());

        Ok(seq)
    }

    /// Returns the hidden features of shape `(n, 512)`, the input of the last layer.
    pub fn features(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(self.features.forward(&xs.to_device(&self.device)?)?)
    }

    /// Returns the number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }
}

impl SubModel for Cnn {
    type Config = CnnConfig;

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let flat_dim = match Self::conv_out_size(config.input_size) {
            Some(o) if o > 0 => o * o * 64,
            _ => bail!(
                "Input size must be at least 36 for the convolutions, got {}",
                config.input_size
            ),
        };
        let device = vb.device().clone();
        let features = Self::create_features(&vb, config.in_channels, flat_dim)?;
        let head = seq().add(linear(FEATURE_DIM, config.n_actions, vb.pp("l2"))?);

        Ok(Self {
            n_actions: config.n_actions,
            device,
            features,
            head,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(self.head.forward(&self.features(xs)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    #[test]
    fn test_conv_out_size() {
        assert_eq!(Cnn::conv_out_size(84), Some(7));
        assert_eq!(Cnn::conv_out_size(36), Some(1));
        assert_eq!(Cnn::conv_out_size(20), None);
    }

    #[test]
    fn test_output_shapes() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let config = CnnConfig::default().input_size(36).n_actions(6);
        let cnn = Cnn::build(vb, config)?;

        let xs = Tensor::zeros((3, 4, 36, 36), DType::U8, &Device::Cpu)?;
        assert_eq!(cnn.forward(&xs)?.dims(), &[3, 6]);
        assert_eq!(cnn.features(&xs)?.dims(), &[3, FEATURE_DIM]);
        assert_eq!(cnn.n_actions(), 6);
        Ok(())
    }

    #[test]
    fn test_too_small_input() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let config = CnnConfig::default().input_size(16);
        assert!(Cnn::build(vb, config).is_err());
    }
}
