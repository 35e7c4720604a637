//! Projection of the learned features to 2D.
//!
//! The hidden features of the CNN are collected while the agent plays
//! greedily, then embedded with classical multidimensional scaling: the
//! squared distance matrix is double-centred and projected onto its top
//! eigenvectors.
use crate::EmbeddingConfig;
use anyhow::{bail, Result};
use deepq_candle_agent::{dqn::Dqn, ObsTensor};
use deepq_core::Env;
use log::{debug, info};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis};
use std::collections::VecDeque;

/// Hidden features of an observation and its largest action value.
#[derive(Clone, Debug)]
pub struct FeatureSample {
    /// Output of the hidden layer before the action-value head.
    pub features: Vec<f32>,

    /// Largest action value of the observation.
    pub q_max: f32,
}

/// Plays greedy episodes and collects features every `config.interval` steps.
///
/// Only the last `config.max_samples` samples are returned.
pub fn collect_features<E>(
    agent: &Dqn<E>,
    env: &mut E,
    config: &EmbeddingConfig,
) -> Result<Vec<FeatureSample>>
where
    E: Env,
    E::Obs: ObsTensor,
{
    let interval = config.interval.max(1);
    let mut samples = VecDeque::with_capacity(config.max_samples);

    for episode in 0..config.n_episodes {
        let mut obs = env.reset()?;
        let mut t = 0;
        let mut total_reward = 0f32;

        loop {
            let (features, q) = agent.features(&obs)?;
            let (action, q_max) = argmax(&q);
            if t % interval == 0 {
                if samples.len() == config.max_samples {
                    samples.pop_front();
                }
                if config.max_samples > 0 {
                    samples.push_back(FeatureSample { features, q_max });
                }
            }

            let step = env.step(action)?;
            total_reward += step.reward;
            t += 1;
            if step.is_done {
                break;
            }
            obs = step.obs;
        }
        debug!("Episode {}: reward {}, {} steps", episode, total_reward, t);
    }
    env.close()?;

    info!("Collected {} feature samples", samples.len());
    Ok(samples.into_iter().collect())
}

fn argmax(q: &[f32]) -> (usize, f32) {
    q.iter()
        .enumerate()
        .fold((0, f32::MIN), |(i, m), (j, v)| if *v > m { (j, *v) } else { (i, m) })
}

/// Pairwise squared Euclidean distances of the rows of `x`.
pub fn squared_distances(x: &Array2<f64>) -> Array2<f64> {
    let n = x.nrows();
    let mut d = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = &x.row(i) - &x.row(j);
            let v = diff.dot(&diff);
            d[[i, j]] = v;
            d[[j, i]] = v;
        }
    }
    d
}

/// `-1/2 J D J` with the centring matrix `J = I - 11'/n`.
pub fn double_centre(d: &Array2<f64>) -> Array2<f64> {
    let n = d.nrows() as f64;
    let row_means = d.sum_axis(Axis(1)) / n;
    let col_means = d.sum_axis(Axis(0)) / n;
    let mean = row_means.sum() / n;

    let mut b = d.clone();
    for ((i, j), v) in b.indexed_iter_mut() {
        *v = -0.5 * (*v - row_means[i] - col_means[j] + mean);
    }
    b
}

/// The `k` largest eigenvalues of a symmetric matrix and their unit
/// eigenvectors, in decreasing order of the eigenvalue.
pub fn top_eigenpairs(b: &Array2<f64>, k: usize) -> Vec<(f64, Array1<f64>)> {
    let n = b.nrows();
    let eigen = DMatrix::from_fn(n, n, |i, j| b[[i, j]]).symmetric_eigen();

    let mut order = (0..n).collect::<Vec<_>>();
    order.sort_by(|&i, &j| eigen.eigenvalues[j].total_cmp(&eigen.eigenvalues[i]));
    order
        .into_iter()
        .take(k)
        .map(|i| {
            let v = eigen.eigenvectors.column(i).iter().copied().collect();
            (eigen.eigenvalues[i], v)
        })
        .collect()
}

/// Classical multidimensional scaling of the rows of `x` into `dim` dimensions.
///
/// Coordinates along eigenvectors with non-positive eigenvalues are zero.
pub fn classical_mds(x: &Array2<f64>, dim: usize) -> Result<Array2<f64>> {
    let n = x.nrows();
    if n < 2 {
        bail!("At least 2 points are required for MDS, got {}", n);
    }

    let b = double_centre(&squared_distances(x));
    let pairs = top_eigenpairs(&b, dim);
    debug!(
        "Top eigenvalues: {:?}",
        pairs.iter().map(|(l, _)| *l).collect::<Vec<_>>()
    );

    let mut coords = Array2::zeros((n, dim));
    for (k, (lambda, v)) in pairs.iter().enumerate() {
        let scale = lambda.max(0.0).sqrt();
        coords.column_mut(k).assign(&(v * scale));
    }
    Ok(coords)
}

/// Projects the features of the samples to 2D.
pub fn embed(samples: &[FeatureSample]) -> Result<Vec<(f32, f32)>> {
    let dim = samples.first().map(|s| s.features.len()).unwrap_or(0);
    let data = samples
        .iter()
        .flat_map(|s| s.features.iter().map(|v| *v as f64))
        .collect::<Vec<_>>();
    let x = Array2::from_shape_vec((samples.len(), dim), data)?;
    let coords = classical_mds(&x, 2)?;
    Ok(coords
        .rows()
        .into_iter()
        .map(|r| (r[0] as f32, r[1] as f32))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn distances(x: &Array2<f64>) -> Array2<f64> {
        squared_distances(x).mapv(f64::sqrt)
    }

    #[test]
    fn test_double_centre_is_gram_of_centred_points() {
        let x = array![[0.0, 0.0], [2.0, 0.0], [0.0, 4.0], [2.0, 4.0]];
        let b = double_centre(&squared_distances(&x));

        let centred = &x - &x.mean_axis(Axis(0)).unwrap();
        let gram = centred.dot(&centred.t());
        for (u, v) in b.iter().zip(gram.iter()) {
            assert!((u - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_top_eigenpairs() {
        let b = array![[4.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let pairs = top_eigenpairs(&b, 2);
        assert!((pairs[0].0 - 4.0).abs() < 1e-9);
        assert!((pairs[1].0 - 2.0).abs() < 1e-9);
        assert!(pairs[1].1[2].abs() > 0.999);
    }

    #[test]
    fn test_top_eigenpairs_close_and_negative_eigenvalues() {
        // Eigenvalues 3 + 1e-9, 3 - 1e-9 and -5, the largest is not the
        // largest in magnitude
        let e = 1e-9;
        let b = array![[3.0, e, 0.0], [e, 3.0, 0.0], [0.0, 0.0, -5.0]];
        let pairs = top_eigenpairs(&b, 2);
        assert!((pairs[0].0 - (3.0 + e)).abs() < 1e-11);
        assert!((pairs[1].0 - (3.0 - e)).abs() < 1e-11);
        for (lambda, v) in pairs.iter() {
            let bv = b.dot(v);
            for (u, w) in bv.iter().zip(v.iter()) {
                assert!((u - lambda * w).abs() < 1e-9);
            }
            assert!(v[2].abs() < 1e-9);
        }
    }

    #[test]
    fn test_mds_preserves_planar_distances() -> Result<()> {
        // Points on a tilted plane in 3D
        let mut rng = StdRng::seed_from_u64(1);
        let n = 30;
        let mut x = Array2::zeros((n, 3));
        for i in 0..n {
            let (u, v) = (rng.gen::<f64>() * 10.0, rng.gen::<f64>() * 3.0);
            x[[i, 0]] = u;
            x[[i, 1]] = v * 0.6;
            x[[i, 2]] = v * 0.8;
        }

        let coords = classical_mds(&x, 2)?;
        assert_eq!(coords.shape(), &[n, 2]);
        let (d0, d1) = (distances(&x), distances(&coords));
        for (u, v) in d0.iter().zip(d1.iter()) {
            assert!((u - v).abs() < 1e-4, "{} vs {}", u, v);
        }
        Ok(())
    }

    #[test]
    fn test_mds_needs_two_points() {
        let x = Array2::zeros((1, 4));
        assert!(classical_mds(&x, 2).is_err());
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.5, -1.0, 0.5]), (1, 0.5));
    }
}
