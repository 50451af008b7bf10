//! Adapters Layer (Driven Adapters)
//!
//! Implementations of `BitVectorStore`.
//!
//! ## Adapters
//!
//! - `InMemoryBitStore` - process-local bitmaps behind one async lock
//! - `RedisBitStore` - Redis strings + Lua scripts (feature `redis`)

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use self::redis::RedisBitStore;
pub use memory::{InMemoryBitStore, MAX_BIT_OFFSET};
