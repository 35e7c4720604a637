//! Utilities.
use anyhow::{anyhow, Context, Result};
use candle_core::{backprop::GradStore, DType, Tensor, Var};
use candle_nn::VarMap;

/// Copies variables of `src` into `dest`.
///
/// Variables are identified by their names. The data is copied, so later
/// updates of `src` do not affect `dest`.
pub fn copy_params(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the destination parameters"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the source parameters"))?;

    for (k, v_dest) in dest.iter() {
        let v_src = src
            .get(k)
            .with_context(|| format!("Parameter {} is missing in the source", k))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// Clamps every element of the gradients of `vars` to `[-clip, clip]`.
pub fn clamp_grads(grads: &mut GradStore, vars: &[Var], clip: f64) -> Result<()> {
    for var in vars.iter() {
        if let Some(g) = grads.get(var) {
            let g = g.clamp(-clip, clip)?;
            grads.insert(var, g);
        }
    }
    Ok(())
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
///
/// `beta` is 1 and the loss is averaged over elements.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?;
    let m2 = (1.0 - &m1)?;
    (((0.5 * m1)? * d.sqr()?)? + (m2 * (d - 0.5)?)?)?.mean_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use candle_nn::Init;

    fn varmap(values: &[f32]) -> Result<VarMap> {
        let vm = VarMap::new();
        let init = Init::Randn {
            mean: 0.0,
            stdev: 1.0,
        };
        vm.get(values.len(), "var1", init, DType::F32, &Device::Cpu)?;
        let t = Tensor::from_slice(values, values.len(), &Device::Cpu)?;
        vm.data().lock().unwrap().get("var1").unwrap().set(&t)?;
        Ok(vm)
    }

    fn values(vm: &VarMap) -> Result<Vec<f32>> {
        let data = vm.data().lock().unwrap();
        Ok(data.get("var1").unwrap().as_tensor().to_vec1()?)
    }

    #[test]
    fn test_copy_params() -> Result<()> {
        let vm_src = varmap(&[1.0, 2.0, 3.0])?;
        let vm_dest = varmap(&[4.0, 5.0, 6.0])?;
        copy_params(&vm_dest, &vm_src)?;
        assert_eq!(values(&vm_dest)?, vec![1.0, 2.0, 3.0]);

        // The destination does not follow later updates of the source
        let t = Tensor::from_slice(&[7f32, 8.0, 9.0], 3, &Device::Cpu)?;
        vm_src.data().lock().unwrap().get("var1").unwrap().set(&t)?;
        assert_eq!(values(&vm_dest)?, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_smooth_l1_loss() -> Result<()> {
        let x = Tensor::from_slice(&[0f32, 0.5, -2.0], 3, &Device::Cpu)?;
        let y = Tensor::zeros(3, DType::F32, &Device::Cpu)?;
        let loss = smooth_l1_loss(&x, &y)?.to_scalar::<f32>()?;
        // (0 + 0.125 + 1.5) / 3
        assert!((loss - 1.625 / 3.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_clamp_grads() -> Result<()> {
        let w = Var::from_slice(&[1f32, -2.0, 0.001], 3, &Device::Cpu)?;
        let scale = Tensor::from_slice(&[100f32, 100.0, 100.0], 3, &Device::Cpu)?;
        let loss = (w.as_tensor() * &scale)?.sum_all()?;
        let mut grads = loss.backward()?;
        clamp_grads(&mut grads, &[w.clone()], 1.0)?;

        let g: Vec<f32> = grads.get(&w).unwrap().to_vec1()?;
        assert_eq!(g, vec![1.0, 1.0, 1.0]);
        Ok(())
    }
}
