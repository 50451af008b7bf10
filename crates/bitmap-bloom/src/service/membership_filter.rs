//! Membership Filter Service
//!
//! Orchestrates offset derivation and the atomic store scripts.
//!
//! The service holds no mutable state. Every call derives its offsets fresh
//! and hands the whole multi-bit step to the store in one `atomic_eval`, so
//! concurrent calls on the same key are serialized by the store alone.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::domain::{
    FilterConfig, FilterParams, HashSequenceGenerator, OffsetEncoder, OffsetSequence,
    ScriptInvocation, ScriptKind,
};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BitVectorStore, MembershipFilterApi};

/// Bloom filter whose bitmap lives in a shared store
///
/// Implements the `MembershipFilterApi` port using an injected store.
pub struct MembershipFilter<S: BitVectorStore> {
    /// Shared bit store (driven port)
    store: Arc<S>,
    /// Offset chain over the injected encoder
    generator: HashSequenceGenerator,
    /// Fixed m and k
    params: FilterParams,
    /// Deadline for each store call
    call_timeout: Option<Duration>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S: BitVectorStore> MembershipFilter<S> {
    /// Create a filter from configuration; the encoder is built from `config.encoder`
    pub fn new(config: &FilterConfig, store: Arc<S>) -> Result<Self, FilterError> {
        config.validate()?;
        let filter = Self::with_encoder(config.params(), config.encoder.build(), store)?;
        Ok(match config.call_timeout() {
            Some(limit) => filter.with_call_timeout(limit),
            None => filter,
        })
    }

    /// Create a filter with an explicit encode capability
    pub fn with_encoder(
        params: FilterParams,
        encoder: Arc<dyn OffsetEncoder>,
        store: Arc<S>,
    ) -> Result<Self, FilterError> {
        params.validate()?;
        Ok(Self {
            store,
            generator: HashSequenceGenerator::new(encoder),
            params,
            call_timeout: None,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    pub fn with_call_timeout(mut self, limit: Duration) -> Self {
        self.call_timeout = Some(limit);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn invocation(
        &self,
        kind: ScriptKind,
        key: &str,
        val: &str,
    ) -> Result<ScriptInvocation, FilterError> {
        if key.is_empty() {
            return Err(FilterError::InvalidKey(
                "bitmap key must not be empty".to_string(),
            ));
        }
        if val.is_empty() {
            return Err(FilterError::InvalidValue(
                "value must not be empty".to_string(),
            ));
        }

        let offsets = self.offsets_for(val)?;
        Ok(ScriptInvocation::new(kind, key, offsets.into_vec()))
    }

    /// Run one script and interpret its reply
    async fn run(&self, kind: ScriptKind, key: &str, val: &str) -> Result<bool, FilterError> {
        let invocation = self.invocation(kind, key, val)?;

        let call = self.store.atomic_eval(&invocation);
        let raw = match self.call_timeout {
            Some(limit) => {
                let after_ms = limit.as_millis() as u64;
                tokio::time::timeout(limit, call)
                    .await
                    .map_err(|_| FilterError::Timeout { after_ms })??
            }
            None => call.await?,
        };

        kind.interpret(raw).map_err(|e| {
            error!(key = key, script = %kind, raw = raw, "Store returned unexpected script result");
            e
        })
    }
}

#[async_trait]
impl<S: BitVectorStore> MembershipFilterApi for MembershipFilter<S> {
    async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError> {
        let start = Instant::now();

        match self.run(ScriptKind::CheckAllSet, key, val).await {
            Ok(found) => {
                self.metrics.record_exist(start.elapsed(), found);
                debug!(
                    key = key,
                    hash_count = self.params.hash_count,
                    found = found,
                    "exist"
                );
                Ok(found)
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(key = key, error = %e, "exist failed");
                Err(e)
            }
        }
    }

    async fn set(&self, key: &str, val: &str) -> Result<(), FilterError> {
        let start = Instant::now();

        match self.run(ScriptKind::SetAll, key, val).await {
            Ok(_) => {
                self.metrics.record_set(start.elapsed());
                debug!(key = key, hash_count = self.params.hash_count, "set");
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(key = key, error = %e, "set failed");
                Err(e)
            }
        }
    }

    fn offsets_for(&self, val: &str) -> Result<OffsetSequence, FilterError> {
        let raw = self.generator.generate(val, self.params.hash_count)?;
        Ok(raw.reduce(self.params.size_bits))
    }
}
