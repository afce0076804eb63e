//! Boundary with the external posterior sampler.
//!
//! The imputer never looks inside the model. It assembles a
//! [`SamplerRequest`] for one column and reads censored-value draws back out
//! of [`PosteriorDraws`].

use crate::config::Distribution;
use crate::error::{Error, Result};
use ndarray::prelude::*;
use std::sync::Arc;

/// Everything the sampler needs to fit one column.
#[derive(Debug, Clone)]
pub struct SamplerRequest<'a> {
    pub n_obs: usize,
    pub n_cens_left: usize,
    pub n_cens_right: usize,
    /// Covariates for every row, aligned with the sorted response.
    pub x_obs: ArrayView2<'a, f64>,
    /// The uncensored responses only.
    pub y_obs: ArrayView1<'a, f64>,
    pub upper: f64,
    pub lower: f64,
    pub k: usize,
    pub iterations: usize,
    pub parallelism: usize,
    pub distribution: Distribution,
}

/// Draw histories for the censored values, one row per draw.
///
/// A side is `None` when it had no censored values; it is then left alone on
/// write-back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosteriorDraws {
    pub y_cens_left: Option<Array2<f64>>,
    pub y_cens_right: Option<Array2<f64>>,
    /// Free-form fit summary, logged when summaries are enabled.
    pub summary: Option<String>,
}

impl PosteriorDraws {
    pub fn new(y_cens_left: Option<Array2<f64>>, y_cens_right: Option<Array2<f64>>) -> Self {
        PosteriorDraws {
            y_cens_left,
            y_cens_right,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// How a draw history is collapsed into values to write back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawReduction {
    Last,
    Mean,
}

impl DrawReduction {
    /// Reduce `draws` to a single row of `expected` values. An empty,
    /// misshapen or non-finite history is a sampler failure.
    pub fn reduce(self, draws: &Array2<f64>, expected: usize) -> Result<Array1<f64>> {
        if draws.ncols() != expected {
            return Err(Error::SamplerFailure {
                column: None,
                source: anyhow::anyhow!(
                    "draws have {} values where {} censored values were expected",
                    draws.ncols(),
                    expected
                ),
            });
        }
        if draws.nrows() == 0 {
            return Err(Error::SamplerFailure {
                column: None,
                source: anyhow::anyhow!("sampler returned an empty draw history"),
            });
        }

        if let Some(value) = draws.iter().find(|v| !v.is_finite()) {
            return Err(Error::SamplerFailure {
                column: None,
                source: anyhow::anyhow!("sampler returned a non-finite draw {}", value),
            });
        }

        let reduced = match self {
            DrawReduction::Last => draws.row(draws.nrows() - 1).to_owned(),
            DrawReduction::Mean => draws.sum_axis(Axis(0)) / draws.nrows() as f64,
        };
        Ok(reduced)
    }
}

/// A posterior sampler for the censored responses of one column.
///
/// Implementations are shared across parallel imputations and so must be
/// `Sync`. Errors are propagated to the caller as sampler failures and are
/// never retried.
pub trait PosteriorSampler: Sync {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws>;
}

impl<S: PosteriorSampler + ?Sized> PosteriorSampler for &S {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        (**self).sample(request)
    }
}

impl<S: PosteriorSampler + ?Sized> PosteriorSampler for Box<S> {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        (**self).sample(request)
    }
}

impl<S: PosteriorSampler + ?Sized + Send> PosteriorSampler for Arc<S> {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        (**self).sample(request)
    }
}
