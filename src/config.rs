use crate::error::{ConfigurationError, Result};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_MAX_ITER: usize = 5;
const DEFAULT_SAMPLER_ITERATIONS: usize = 4000;
const DEFAULT_PARALLELISM: usize = 8;

/// Response distribution of the censored regression model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Gaussian,
    TDistribution,
    SkewNormal,
}

impl Distribution {
    pub fn name(self) -> &'static str {
        match self {
            Distribution::Gaussian => "gaussian",
            Distribution::TDistribution => "t_distribution",
            Distribution::SkewNormal => "skew_normal",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which columns serve as covariates when a column is imputed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnChoice {
    All,
    /// A reduced covariate set of the given size. Not implemented; imputing
    /// with it fails.
    Count(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationOrder {
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputerConfig {
    /// Write back a posterior draw instead of the posterior mean.
    pub sample_posterior: bool,
    pub column_choice: ColumnChoice,
    pub distribution: Distribution,
    /// Sweeps run by `impute` when no explicit count is given.
    pub max_iter: usize,
    /// Iterations per sampler invocation.
    pub sampler_iterations: usize,
    /// Chains the sampler may run in parallel.
    pub parallelism: usize,
    pub imputation_order: ImputationOrder,
    pub number_imputations: usize,
    /// Log the sampler's fit summary after every column.
    pub log_summaries: bool,
    pub progress: bool,
}

impl Default for ImputerConfig {
    fn default() -> Self {
        ImputerConfig {
            sample_posterior: true,
            column_choice: ColumnChoice::All,
            distribution: Distribution::Gaussian,
            max_iter: DEFAULT_MAX_ITER,
            sampler_iterations: DEFAULT_SAMPLER_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
            imputation_order: ImputationOrder::Ascending,
            number_imputations: 1,
            log_summaries: false,
            progress: false,
        }
    }
}

impl ImputerConfig {
    #[must_use]
    pub fn with_sample_posterior(mut self, sample_posterior: bool) -> Self {
        self.sample_posterior = sample_posterior;
        self
    }

    #[must_use]
    pub fn with_column_choice(mut self, column_choice: ColumnChoice) -> Self {
        self.column_choice = column_choice;
        self
    }

    #[must_use]
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub fn with_sampler_iterations(mut self, iterations: usize) -> Self {
        self.sampler_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[must_use]
    pub fn with_number_imputations(mut self, number_imputations: usize) -> Self {
        self.number_imputations = number_imputations;
        self
    }

    #[must_use]
    pub fn with_log_summaries(mut self, log_summaries: bool) -> Self {
        self.log_summaries = log_summaries;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn is_multiple(&self) -> bool {
        self.number_imputations > 1
    }

    /// Checks that can be made before any data is seen.
    pub fn validate(&self) -> Result<()> {
        if self.number_imputations == 0 {
            return Err(ConfigurationError::ZeroImputations.into());
        }
        if self.max_iter == 0 {
            return Err(ConfigurationError::ZeroSweeps.into());
        }
        if !self.sample_posterior && self.is_multiple() {
            return Err(
                ConfigurationError::DeterministicMultipleImputation(self.number_imputations).into(),
            );
        }
        Ok(())
    }
}
