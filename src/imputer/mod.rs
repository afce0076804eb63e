use crate::censoring::{classify, Bounds, CensoringPartition};
use crate::config::ImputerConfig;
use crate::error::{Error, Result};
use crate::model::{ModelCache, ModelCompiler};
use crate::sampler::{DrawReduction, PosteriorSampler, SamplerRequest};
use crate::table::Table;
use log::debug;
use ndarray::prelude::*;
use std::sync::Arc;

pub mod chained;
pub mod multiple;

/// Completed data: one table, or one per requested imputation.
#[derive(Debug, Clone, PartialEq)]
pub enum Imputation {
    Single(Table),
    Multiple(Vec<Table>),
}

impl Imputation {
    pub fn single(self) -> Option<Table> {
        match self {
            Imputation::Single(table) => Some(table),
            Imputation::Multiple(_) => None,
        }
    }

    pub fn into_tables(self) -> Vec<Table> {
        match self {
            Imputation::Single(table) => vec![table],
            Imputation::Multiple(tables) => tables,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Imputation::Single(_) => 1,
            Imputation::Multiple(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Imputes censored columns by chained regressions on the other columns,
/// resolving each column with draws from `S`.
pub struct CensoredImputer<S> {
    config: ImputerConfig,
    sampler: S,
}

impl<S: PosteriorSampler> CensoredImputer<S> {
    /// Fails when the configuration can never be run, e.g. multiple
    /// imputation without posterior sampling.
    pub fn new(config: ImputerConfig, sampler: S) -> Result<Self> {
        config.validate()?;
        Ok(CensoredImputer { config, sampler })
    }

    pub fn config(&self) -> &ImputerConfig {
        &self.config
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    fn reduction(&self) -> DrawReduction {
        if self.config.sample_posterior {
            DrawReduction::Last
        } else {
            DrawReduction::Mean
        }
    }

    /// Impute the censored values of one ascending column in place.
    ///
    /// `x` holds the covariates for every row of `y`, in the same order. A
    /// column with nothing at or beyond either bound is left untouched and
    /// the sampler is not called. Only the censored segments are ever
    /// written; an unsorted column is refused before anything changes.
    pub fn impute_once(
        &self,
        mut y: ArrayViewMut1<'_, f64>,
        x: ArrayView2<'_, f64>,
        bounds: &Bounds,
    ) -> Result<CensoringPartition> {
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                expected: y.len(),
                actual: x.nrows(),
            });
        }

        let partition = classify(&y, bounds)?;
        if partition.is_uncensored() {
            return Ok(partition);
        }

        let draws = {
            let request = SamplerRequest {
                n_obs: partition.n_obs,
                n_cens_left: partition.n_cens_left,
                n_cens_right: partition.n_cens_right,
                x_obs: x.view(),
                y_obs: y.slice(s![partition.observed()]),
                upper: bounds.upper_or_infinity(),
                lower: bounds.lower_or_neg_infinity(),
                k: x.ncols(),
                iterations: self.config.sampler_iterations,
                parallelism: self.config.parallelism,
                distribution: self.config.distribution,
            };
            self.sampler
                .sample(&request)
                .map_err(|source| Error::SamplerFailure {
                    column: None,
                    source,
                })?
        };

        if self.config.log_summaries {
            if let Some(summary) = &draws.summary {
                debug!("{}", summary);
            }
        }

        // both sides are reduced before either is written
        let reduction = self.reduction();
        let right = draws
            .y_cens_right
            .as_ref()
            .map(|draws| reduction.reduce(draws, partition.n_cens_right))
            .transpose()?;
        let left = draws
            .y_cens_left
            .as_ref()
            .map(|draws| reduction.reduce(draws, partition.n_cens_left))
            .transpose()?;

        if let Some(values) = right {
            y.slice_mut(s![partition.right()]).assign(&values);
        }
        if let Some(values) = left {
            y.slice_mut(s![partition.left()]).assign(&values);
        }

        Ok(partition)
    }

    /// Sort the whole table by `column` and impute it on every other column.
    pub(crate) fn impute_column(
        &self,
        data: &mut Table,
        column: usize,
        bounds: &Bounds,
    ) -> Result<CensoringPartition> {
        data.sort_by_column(column);
        let x = data.covariates(column);
        let partition = self
            .impute_once(data.column_mut(column), x.view(), bounds)
            .map_err(|e| e.in_column(column))?;

        debug!(
            "column {}: {} left and {} right censored of {}",
            column,
            partition.n_cens_left,
            partition.n_cens_right,
            partition.len()
        );
        Ok(partition)
    }
}

impl<M> CensoredImputer<Arc<M>>
where
    M: PosteriorSampler + Send,
{
    /// Build an imputer whose sampler is the cached model for the configured
    /// distribution, compiling it if the cache has none.
    pub fn from_cache<C>(config: ImputerConfig, cache: &ModelCache<M>, compiler: &C) -> Result<Self>
    where
        C: ModelCompiler<Model = M>,
    {
        config.validate()?;
        let model = cache.get_for(config.distribution, compiler)?;
        CensoredImputer::new(config, model)
    }
}
