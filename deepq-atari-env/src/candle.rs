//! Conversion of observations into input tensors of `deepq-candle-agent`.
use crate::LazyFrames;
use anyhow::Result;
use candle_core::{Device, Tensor};
use deepq_candle_agent::ObsTensor;
use deepq_core::error::DeepqError;

impl ObsTensor for LazyFrames {
    /// Stacks observations into a `u8` tensor of shape `(n, k, height, width)`.
    fn to_tensor_batch(obs: &[&Self], device: &Device) -> Result<Tensor> {
        let shape = match obs.first() {
            Some(o) => o.shape(),
            None => {
                return Err(DeepqError::ObservationShape {
                    expected: vec![1, 0, 0, 0],
                    found: vec![0],
                }
                .into())
            }
        };
        let [h, w, c] = shape;
        let mut data = Vec::with_capacity(obs.len() * h * w * c);
        for o in obs.iter() {
            if o.shape() != shape {
                return Err(DeepqError::ObservationShape {
                    expected: shape.to_vec(),
                    found: o.shape().to_vec(),
                }
                .into());
            }
            data.extend(o.force().iter().copied());
        }

        let t = Tensor::from_vec(data, (obs.len(), h, w, c), device)?;
        Ok(t.permute((0, 3, 1, 2))?.contiguous()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use std::sync::Arc;

    #[test]
    fn test_channels_first() -> Result<()> {
        let frames = (0..4)
            .map(|v| Arc::new(Array3::from_elem((3, 2, 1), v as u8)))
            .collect();
        let lazy = LazyFrames::new(frames)?;
        let t = LazyFrames::to_tensor_batch(&[&lazy, &lazy], &Device::Cpu)?;
        assert_eq!(t.dims(), &[2, 4, 3, 2]);
        let v: Vec<u8> = t.get(1)?.get(2)?.flatten_all()?.to_vec1()?;
        assert_eq!(v, vec![2; 6]);
        Ok(())
    }
}
