//! Fan-out into several completed datasets.
//!
//! All imputations share one burn-in chain of `iter_val - 1` sweeps. Only the
//! final sweep runs separately for each clone, so between-imputation
//! variance reflects a single sweep of posterior draws rather than fully
//! independent chains.

use super::CensoredImputer;
use crate::censoring::Bounds;
use crate::error::Result;
use crate::sampler::PosteriorSampler;
use crate::table::Table;
use log::{debug, info};
use rayon::prelude::*;

impl<S: PosteriorSampler> CensoredImputer<S> {
    /// Burn in on `data`, then give each of the configured imputations its
    /// own copy and final sweep. Clones share no state, so the final sweeps
    /// run in parallel.
    pub(crate) fn replicate(
        &self,
        mut data: Table,
        bounds: &[Bounds],
        iter_val: usize,
    ) -> Result<Vec<Table>> {
        let n_imputations = self.config.number_imputations;
        let burn_in = iter_val.saturating_sub(1);
        let progress = self.progress_bar(burn_in + n_imputations);

        debug!("running {} shared burn-in sweeps", burn_in);
        self.run_chain(&mut data, bounds, burn_in, &progress)?;

        info!("replicating table into {} imputations", n_imputations);
        let clones = vec![data; n_imputations];

        let imputations = clones
            .into_par_iter()
            .enumerate()
            .map(|(imputation, mut table)| {
                debug!("final sweep for imputation {}", imputation);
                self.sweep(&mut table, bounds)?;
                progress.inc(1);
                Ok(table)
            })
            .collect::<Result<Vec<_>>>()?;

        progress.finish_and_clear();
        Ok(imputations)
    }
}
