#[cfg(doctest)]
use doc_comment::doctest;


pub mod censoring;
pub mod config;
pub mod error;
pub mod imputer;
pub mod model;
pub mod sampler;
pub mod table;
#[cfg(test)]
mod testing;
mod utils;

pub use censoring::{Bounds, CensoringPartition};
pub use config::{ColumnChoice, Distribution, ImputationOrder, ImputerConfig};
pub use error::{ConfigurationError, Error};
pub use imputer::{CensoredImputer, Imputation};
pub use model::{CacheStore, InMemoryStore, ModelCache, ModelCompiler, ModelSpec};
pub use sampler::{PosteriorDraws, PosteriorSampler, SamplerRequest};
pub use table::Table;

#[cfg(doctest)]
doctest!("../README.md");
