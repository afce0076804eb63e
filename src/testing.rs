//! Deterministic samplers for unit tests.

use crate::sampler::{PosteriorDraws, PosteriorSampler, SamplerRequest};
use ndarray::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Moves censored values past their bound: the first draw by 10, the last
/// by 1.
#[derive(Default)]
pub struct ShiftSampler {
    calls: AtomicUsize,
}

impl ShiftSampler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn shifted(n: usize, bound: f64, direction: f64) -> Array2<f64> {
    Array2::from_shape_fn((2, n), |(draw, _)| {
        let shift = if draw == 0 { 10. } else { 1. };
        bound + direction * shift
    })
}

impl PosteriorSampler for ShiftSampler {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let left = if request.n_cens_left > 0 {
            Some(shifted(request.n_cens_left, request.lower, -1.))
        } else {
            None
        };
        let right = if request.n_cens_right > 0 {
            Some(shifted(request.n_cens_right, request.upper, 1.))
        } else {
            None
        };
        Ok(PosteriorDraws::new(left, right).with_summary("shift sampler"))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub n_obs: usize,
    pub n_cens_left: usize,
    pub n_cens_right: usize,
    pub x_obs: Array2<f64>,
    pub y_obs: Array1<f64>,
    pub upper: f64,
    pub lower: f64,
    pub k: usize,
    pub iterations: usize,
    pub parallelism: usize,
    pub distribution: crate::config::Distribution,
}

/// Keeps every request and answers with no draws.
#[derive(Default)]
pub struct RecordingSampler {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingSampler {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PosteriorSampler for RecordingSampler {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        self.requests.lock().unwrap().push(RecordedRequest {
            n_obs: request.n_obs,
            n_cens_left: request.n_cens_left,
            n_cens_right: request.n_cens_right,
            x_obs: request.x_obs.to_owned(),
            y_obs: request.y_obs.to_owned(),
            upper: request.upper,
            lower: request.lower,
            k: request.k,
            iterations: request.iterations,
            parallelism: request.parallelism,
            distribution: request.distribution,
        });
        Ok(PosteriorDraws::default())
    }
}

pub struct FailingSampler;

impl PosteriorSampler for FailingSampler {
    fn sample(&self, _: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        Err(anyhow::anyhow!("chains did not converge"))
    }
}

/// Succeeds until `fail_at` calls have been made, then fails.
pub struct FailAfterSampler {
    inner: ShiftSampler,
    fail_at: usize,
}

impl FailAfterSampler {
    pub fn new(fail_at: usize) -> Self {
        FailAfterSampler {
            inner: ShiftSampler::default(),
            fail_at,
        }
    }
}

impl PosteriorSampler for FailAfterSampler {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        if self.inner.calls() >= self.fail_at {
            return Err(anyhow::anyhow!("sampler crashed"));
        }
        self.inner.sample(request)
    }
}

/// Answers every request with the same draws, whatever their shape.
pub struct FixedSampler {
    draws: PosteriorDraws,
}

impl FixedSampler {
    pub fn new(y_cens_left: Option<Array2<f64>>, y_cens_right: Option<Array2<f64>>) -> Self {
        FixedSampler {
            draws: PosteriorDraws::new(y_cens_left, y_cens_right),
        }
    }
}

impl PosteriorSampler for FixedSampler {
    fn sample(&self, _: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        Ok(self.draws.clone())
    }
}
