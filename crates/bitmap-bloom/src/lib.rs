//! # Bitmap Bloom
//!
//! Bloom filter whose bit array lives in a shared, remotely accessible
//! bitmap store instead of local memory.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `HashSequenceGenerator`: chained offset derivation
//!   - `OffsetEncoder`: pluggable string -> integer capability
//!   - `ScriptKind` / `ScriptInvocation`: the two atomic bit scripts
//!   - `FilterConfig` / `FilterConfigBuilder`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipFilterApi`: Driving port (`exist`, `set`)
//!   - `BitVectorStore`: Driven port (`get_bit`, `set_bit`, `atomic_eval`)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `MembershipFilter`: Implements `MembershipFilterApi`
//!
//! - **Adapters Layer** (`adapters/`): Store implementations
//!   - `InMemoryBitStore`: process-local bitmaps
//!   - `RedisBitStore`: Redis strings and Lua scripts (feature `redis`)
//!
//! ## Invariants
//!
//! - No false negatives: after `set(key, v)` succeeds, `exist(key, v)` is true
//! - Bits only ever go from 0 to 1
//! - Each call's k-bit read or write is one atomic unit in the store
//!
//! ## Usage Example
//!
//! ```ignore
//! use bitmap_bloom::{FilterConfigBuilder, InMemoryBitStore, MembershipFilter, MembershipFilterApi};
//! use std::sync::Arc;
//!
//! let config = FilterConfigBuilder::new()
//!     .size_bits(1 << 20)
//!     .hash_count(5)
//!     .build()?;
//!
//! let filter = MembershipFilter::new(&config, Arc::new(InMemoryBitStore::new()))?;
//!
//! filter.set("bloom:emails", "alice@example.com").await?;
//! assert!(filter.exist("bloom:emails", "alice@example.com").await?);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryBitStore;
#[cfg(feature = "redis")]
pub use adapters::RedisBitStore;
pub use domain::{
    EncoderKind, FilterConfig, FilterConfigBuilder, FilterParams, HashSequenceGenerator,
    Murmur3Encoder, OffsetEncoder, OffsetSequence, ScriptInvocation, ScriptKind, Sha256Encoder,
    SipEncoder,
};
pub use error::{EncodeError, FilterError, StoreError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BitVectorStore, MembershipFilterApi};
pub use service::MembershipFilter;
