//! Outbound Ports (Driven Ports)
//!
//! The filter needs exactly three things from the shared bit store.

use async_trait::async_trait;

use crate::domain::ScriptInvocation;
use crate::error::StoreError;

/// Shared, named, bit-addressable store (Driven Port)
///
/// Implementations own all serialization: `atomic_eval` must run the whole
/// invocation as one unit relative to every other call on the same key.
#[async_trait]
pub trait BitVectorStore: Send + Sync {
    /// Read one bit; unset and never-written bits read as `false`
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool, StoreError>;

    /// Raise one bit to 1
    async fn set_bit(&self, key: &str, offset: u64) -> Result<(), StoreError>;

    /// Run an atomic script and return its raw integer reply
    async fn atomic_eval(&self, invocation: &ScriptInvocation) -> Result<i64, StoreError>;
}
