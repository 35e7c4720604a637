//! Interface of neural networks used in the agent.
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::VarBuilder;

/// Neural network model not owing its [`VarMap`] internally.
///
/// Policy and target networks are two instances built from the same
/// configuration on different [`VarMap`]s, so that parameters can be copied
/// between them by name.
///
/// [`VarMap`]: candle_nn::VarMap
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Builds [`SubModel`] with [`VarBuilder`] and [`SubModel::Config`].
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Computes action values of a batch of observations.
    fn forward(&self, xs: &Tensor) -> Result<Tensor>;
}
