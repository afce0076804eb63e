//! Compile-once cache for sampler models.
//!
//! Models are keyed by a content hash of their specification, so a changed
//! model source is recompiled while an unchanged one is reused. Storage is
//! behind [`CacheStore`] and never touches the filesystem on its own.

use crate::config::Distribution;
use crate::error::{Error, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Source of a model together with the distribution it implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub distribution: Distribution,
    pub source: String,
}

impl ModelSpec {
    pub fn new(distribution: Distribution, source: impl Into<String>) -> Self {
        ModelSpec {
            distribution,
            source: source.into(),
        }
    }

    /// Hex SHA-256 over the distribution name and the source.
    pub fn key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.distribution.name().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.source.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Turns a model specification into something that can sample.
pub trait ModelCompiler {
    type Model;

    fn model_source(&self, distribution: Distribution) -> String;

    fn compile(&self, spec: &ModelSpec) -> anyhow::Result<Self::Model>;
}

pub trait CacheStore<M>: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<Arc<M>>>;

    fn insert(&self, key: &str, model: Arc<M>) -> anyhow::Result<()>;
}

pub struct InMemoryStore<M> {
    models: Mutex<HashMap<String, Arc<M>>>,
}

impl<M> InMemoryStore<M> {
    pub fn new() -> Self {
        InMemoryStore {
            models: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.models.lock().map_or(0, |models| models.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Default for InMemoryStore<M> {
    fn default() -> Self {
        InMemoryStore::new()
    }
}

impl<M: Send + Sync> CacheStore<M> for InMemoryStore<M> {
    fn get(&self, key: &str) -> anyhow::Result<Option<Arc<M>>> {
        let models = self
            .models
            .lock()
            .map_err(|_| anyhow::anyhow!("model store lock poisoned"))?;
        Ok(models.get(key).cloned())
    }

    fn insert(&self, key: &str, model: Arc<M>) -> anyhow::Result<()> {
        let mut models = self
            .models
            .lock()
            .map_err(|_| anyhow::anyhow!("model store lock poisoned"))?;
        models.insert(key.to_string(), model);
        Ok(())
    }
}

/// Shared cache of compiled models. Clone the owning `Arc` to share it
/// across the process.
pub struct ModelCache<M> {
    store: Box<dyn CacheStore<M>>,
    compiling: Mutex<()>,
}

impl<M: Send + Sync + 'static> ModelCache<M> {
    pub fn in_memory() -> Self {
        ModelCache::with_store(InMemoryStore::new())
    }
}

impl<M> ModelCache<M> {
    pub fn with_store<S: CacheStore<M> + 'static>(store: S) -> Self {
        ModelCache {
            store: Box::new(store),
            compiling: Mutex::new(()),
        }
    }

    /// Reuse the model compiled for `spec`, compiling it on first request.
    ///
    /// Lookup, compilation and insertion happen under one lock, so concurrent
    /// callers asking for the same spec compile it once.
    pub fn get_or_compile<C>(&self, spec: &ModelSpec, compiler: &C) -> Result<Arc<M>>
    where
        C: ModelCompiler<Model = M>,
    {
        let key = spec.key();
        let _compiling = self
            .compiling
            .lock()
            .map_err(|_| Error::Cache(anyhow::anyhow!("model cache lock poisoned")))?;
        if let Some(model) = self.store.get(&key).map_err(Error::Cache)? {
            debug!("reusing compiled {} model {}", spec.distribution, &key[..10]);
            return Ok(model);
        }

        info!("compiling {} model {}", spec.distribution, &key[..10]);
        let model = Arc::new(compiler.compile(spec).map_err(Error::Cache)?);
        self.store
            .insert(&key, Arc::clone(&model))
            .map_err(Error::Cache)?;
        Ok(model)
    }

    pub fn get_for<C>(&self, distribution: Distribution, compiler: &C) -> Result<Arc<M>>
    where
        C: ModelCompiler<Model = M>,
    {
        let spec = ModelSpec::new(distribution, compiler.model_source(distribution));
        self.get_or_compile(&spec, compiler)
    }
}
