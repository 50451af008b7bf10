//! Inbound Ports (Driving Ports)
//!
//! The whole caller-facing surface of the filter.

use async_trait::async_trait;

use crate::domain::OffsetSequence;
use crate::error::FilterError;

/// Membership filter API (Driving Port)
#[async_trait]
pub trait MembershipFilterApi: Send + Sync {
    /// Test whether `val` may have been added under `key`
    ///
    /// # Returns
    /// - `Ok(true)` if every derived bit is set (possibly a false positive)
    /// - `Ok(false)` if at least one derived bit is unset (never a false negative)
    /// - `Err` on any store failure or unexpected reply
    async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError>;

    /// Record `val` under `key` by raising all derived bits in one atomic step
    async fn set(&self, key: &str, val: &str) -> Result<(), FilterError>;

    /// Bit offsets `val` maps to, already bounded to the bitmap
    fn offsets_for(&self, val: &str) -> Result<OffsetSequence, FilterError>;
}
