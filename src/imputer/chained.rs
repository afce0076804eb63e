//! The chained-equations sweep.
//!
//! One sweep visits every column in ascending order. Each visit sorts the
//! whole table by the column and resolves its censored values conditional on
//! the current values of all other columns, so later columns see the
//! imputations made earlier in the same sweep. Columns cannot run
//! concurrently within a sweep.
//!
//! Sweeps are not transactional. When the sampler fails on a column, the
//! columns already imputed keep their new values and the table stays sorted
//! by the failing column.

use super::{CensoredImputer, Imputation};
use crate::censoring::Bounds;
use crate::config::ColumnChoice;
use crate::error::{ConfigurationError, Error, Result};
use crate::sampler::PosteriorSampler;
use crate::table::Table;
use crate::utils::contains_missing;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

const PROGRESS_TEMPLATE: &str = "{msg} {wide_bar} {pos}/{len} sweeps, elapsed {elapsed_precise}";

/// Pair per-column upper and lower bounds, rejecting anything malformed.
///
/// Both arrays are required; use `None` entries for unbounded sides.
pub fn column_bounds(
    n_columns: usize,
    upper: Option<&[Option<f64>]>,
    lower: Option<&[Option<f64>]>,
) -> Result<Vec<Bounds>> {
    let (upper, lower) = match (upper, lower) {
        (Some(upper), Some(lower)) => (upper, lower),
        _ => return Err(ConfigurationError::MissingBounds.into()),
    };

    if upper.len() != n_columns || lower.len() != n_columns {
        return Err(ConfigurationError::BoundCountMismatch {
            columns: n_columns,
            upper: upper.len(),
            lower: lower.len(),
        }
        .into());
    }

    upper
        .iter()
        .zip(lower.iter())
        .enumerate()
        .map(|(column, (&upper, &lower))| {
            for value in upper.iter().chain(lower.iter()) {
                if !value.is_finite() {
                    return Err(Error::from(ConfigurationError::NonFiniteBound {
                        column,
                        value: *value,
                    }));
                }
            }
            Ok(Bounds::new(lower, upper))
        })
        .collect()
}

impl<S: PosteriorSampler> CensoredImputer<S> {
    /// Impute with the configured number of sweeps.
    pub fn impute(
        &self,
        data: Table,
        upper: Option<&[Option<f64>]>,
        lower: Option<&[Option<f64>]>,
    ) -> Result<Imputation> {
        self.impute_sweeps(data, upper, lower, self.config.max_iter)
    }

    /// Run `iter_val` sweeps over `data`.
    ///
    /// With one imputation configured the completed table is returned, its
    /// rows sorted by the last column; `Table::into_input_order` restores
    /// the input order. With more, the first `iter_val - 1` sweeps are
    /// shared and each imputation gets its own final sweep.
    pub fn impute_sweeps(
        &self,
        data: Table,
        upper: Option<&[Option<f64>]>,
        lower: Option<&[Option<f64>]>,
        iter_val: usize,
    ) -> Result<Imputation> {
        let bounds = self.validate_call(&data, upper, lower, iter_val)?;
        info!(
            "imputing {} columns over {} rows with {} sweeps",
            data.n_columns(),
            data.n_rows(),
            iter_val
        );

        let imputation = if self.config.is_multiple() {
            Imputation::Multiple(self.replicate(data, &bounds, iter_val)?)
        } else {
            let mut data = data;
            let progress = self.progress_bar(iter_val);
            self.run_chain(&mut data, &bounds, iter_val, &progress)?;
            progress.finish_and_clear();
            Imputation::Single(data)
        };

        info!("imputation complete");
        Ok(imputation)
    }

    /// Run `iter_val` sweeps of a single chain directly on `data`.
    ///
    /// Validation happens before any row moves. After a sampler failure the
    /// table keeps every column imputed before the failing one.
    pub fn impute_in_place(
        &self,
        data: &mut Table,
        upper: Option<&[Option<f64>]>,
        lower: Option<&[Option<f64>]>,
        iter_val: usize,
    ) -> Result<()> {
        let bounds = self.validate_call(data, upper, lower, iter_val)?;
        let progress = self.progress_bar(iter_val);
        self.run_chain(data, &bounds, iter_val, &progress)?;
        progress.finish_and_clear();
        Ok(())
    }

    pub(crate) fn validate_call(
        &self,
        data: &Table,
        upper: Option<&[Option<f64>]>,
        lower: Option<&[Option<f64>]>,
        iter_val: usize,
    ) -> Result<Vec<Bounds>> {
        debug!("validating imputation call");
        if iter_val == 0 {
            return Err(ConfigurationError::ZeroSweeps.into());
        }
        if let ColumnChoice::Count(n) = self.config.column_choice {
            return Err(ConfigurationError::UnsupportedColumnChoice(n).into());
        }

        let bounds = column_bounds(data.n_columns(), upper, lower)?;
        if let Some(column) = (0..data.n_columns()).find(|&c| contains_missing(&data.column(c))) {
            return Err(Error::MissingValues { column });
        }
        Ok(bounds)
    }

    pub(crate) fn run_chain(
        &self,
        data: &mut Table,
        bounds: &[Bounds],
        sweeps: usize,
        progress: &ProgressBar,
    ) -> Result<()> {
        for sweep in 0..sweeps {
            debug!("sweep {} of {}", sweep + 1, sweeps);
            self.sweep(data, bounds)?;
            progress.inc(1);
        }
        Ok(())
    }

    /// One pass over every column in ascending order.
    pub(crate) fn sweep(&self, data: &mut Table, bounds: &[Bounds]) -> Result<()> {
        for (column, column_bounds) in bounds.iter().enumerate() {
            if let Err(e) = self.impute_column(data, column, column_bounds) {
                warn!("sweep aborted at column {}: {}", column, e);
                return Err(e);
            }
        }
        Ok(())
    }

    pub(crate) fn progress_bar(&self, sweeps: usize) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(sweeps as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            progress.set_style(style);
        }
        progress.set_message(self.config.distribution.name());
        progress
    }
}
