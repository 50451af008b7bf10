//! # Bloom Runtime
//!
//! Entry point for the shared-bitmap Bloom filter process.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`BLOOM_LOG_LEVEL` / `RUST_LOG`)
//! 2. Load configuration (file, then environment overrides)
//! 3. Connect the bit store (Redis if configured, otherwise in-memory)
//! 4. Serve commands from stdin until EOF or Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bitmap_bloom::{BitVectorStore, InMemoryBitStore, MembershipFilter, Metrics};
use bloom_runtime::config::log_level_from;
use bloom_runtime::{serve, RuntimeConfig};

/// Build the filter over `store` and serve stdin until EOF or Ctrl+C.
async fn run<S>(config: &RuntimeConfig, store: Arc<S>) -> Result<()>
where
    S: BitVectorStore,
{
    let metrics = Arc::new(Metrics::new());
    let filter = MembershipFilter::new(&config.filter, store)
        .context("Failed to build membership filter")?
        .with_metrics(metrics.clone());

    info!(
        size_bits = config.filter.size_bits,
        hash_count = config.filter.hash_count,
        encoder = %config.filter.encoder,
        "Membership filter ready"
    );

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    tokio::select! {
        served = serve(&filter, &metrics, input, output) => {
            let answered = served?;
            info!(answered = answered, "Input closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    let snapshot = metrics.snapshot();
    info!(
        exists = snapshot.exists_performed,
        sets = snapshot.sets_performed,
        failures = snapshot.failures,
        "Final metrics"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; replies go to stdout, logs to stderr
    let env_lookup = |name: &str| std::env::var(name).ok();
    let filter = EnvFilter::try_new(log_level_from(&env_lookup))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env()?;

    #[cfg(feature = "redis")]
    if let Some(url) = &config.redis_url {
        let store = bitmap_bloom::RedisBitStore::connect(url)
            .await
            .context("Failed to connect to Redis")?;
        return run(&config, Arc::new(store)).await;
    }

    if config.redis_url.is_some() && cfg!(not(feature = "redis")) {
        warn!("BLOOM_REDIS_URL is set but this build has no redis support");
    }
    warn!("Using in-memory bit store; filter state is local to this process");

    run(&config, Arc::new(InMemoryBitStore::new())).await
}
