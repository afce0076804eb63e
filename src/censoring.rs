use crate::error::{Error, Result};
use crate::utils::is_sorted_ascending;
use ndarray::prelude::*;
use ndarray::Data;
use serde_derive::{Deserialize, Serialize};
use std::ops::Range;

/// Censoring points of one column. `None` means values were never clipped
/// on that side.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Bounds { lower, upper }
    }

    pub fn unbounded() -> Self {
        Bounds::default()
    }

    /// Lower bound handed to the sampler, `-inf` when absent.
    pub fn lower_or_neg_infinity(&self) -> f64 {
        self.lower.unwrap_or(f64::NEG_INFINITY)
    }

    /// Upper bound handed to the sampler, `+inf` when absent.
    pub fn upper_or_infinity(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }
}

/// Sizes of the three contiguous segments of an ascending column: values at
/// or below the lower bound, values strictly inside, values at or above the
/// upper bound.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensoringPartition {
    pub n_cens_left: usize,
    pub n_obs: usize,
    pub n_cens_right: usize,
}

impl CensoringPartition {
    pub fn len(&self) -> usize {
        self.n_cens_left + self.n_obs + self.n_cens_right
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nothing to impute.
    pub fn is_uncensored(&self) -> bool {
        self.n_cens_left == 0 && self.n_cens_right == 0
    }

    pub fn left(&self) -> Range<usize> {
        0..self.n_cens_left
    }

    pub fn observed(&self) -> Range<usize> {
        self.n_cens_left..self.n_cens_left + self.n_obs
    }

    pub fn right(&self) -> Range<usize> {
        self.n_cens_left + self.n_obs..self.len()
    }
}

/// Count the censored values of an ascending column.
///
/// Ties with a bound count as censored, since clipped values are recorded
/// exactly at the bound. The column is never reordered here.
pub fn classify<S>(y: &ArrayBase<S, Ix1>, bounds: &Bounds) -> Result<CensoringPartition>
where
    S: Data<Elem = f64>,
{
    if !is_sorted_ascending(y) {
        return Err(Error::PreconditionViolation { column: None });
    }

    let n_cens_right = bounds
        .upper
        .map_or(0, |upper| y.iter().filter(|&&v| v >= upper).count());
    let n_cens_left = bounds
        .lower
        .map_or(0, |lower| y.iter().filter(|&&v| v <= lower).count());

    let n = y.len();
    if n_cens_left + n_cens_right > n {
        return Err(Error::OverlappingBounds {
            lower: bounds.lower_or_neg_infinity(),
            upper: bounds.upper_or_infinity(),
        });
    }

    Ok(CensoringPartition {
        n_cens_left,
        n_obs: n - n_cens_left - n_cens_right,
        n_cens_right,
    })
}
