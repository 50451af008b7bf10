//! Chained offset derivation
//!
//! ```text
//! offset[0] = encode(val)
//! offset[i] = encode(decimal(offset[i-1]))    for i in 1..k
//! ```
//!
//! The chain runs on raw encoder output. Bounding to the bitmap happens
//! afterwards in [`OffsetSequence::reduce`], so a sequence depends only on
//! `val`, `k` and the encoder.

use std::sync::Arc;

use crate::error::EncodeError;

use super::encoder::OffsetEncoder;
use super::params::MAX_HASH_COUNT;

/// Ordered offsets for one value; built per call and never stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetSequence(Vec<u64>);

impl OffsetSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }

    /// Map every offset into `[0, size_bits)`
    ///
    /// Offsets already in range are left untouched.
    pub fn reduce(self, size_bits: u64) -> Self {
        debug_assert!(size_bits > 0);
        Self(
            self.0
                .into_iter()
                .map(|offset| offset % size_bits)
                .collect(),
        )
    }
}

impl From<Vec<u64>> for OffsetSequence {
    fn from(offsets: Vec<u64>) -> Self {
        Self(offsets)
    }
}

/// Derives k offsets from a value by re-encoding each previous result
#[derive(Clone)]
pub struct HashSequenceGenerator {
    encoder: Arc<dyn OffsetEncoder>,
}

impl HashSequenceGenerator {
    pub fn new(encoder: Arc<dyn OffsetEncoder>) -> Self {
        Self { encoder }
    }

    /// Produce exactly `k` offsets for `val`
    ///
    /// Pre-allocation is capped at `MAX_HASH_COUNT`; larger `k` grows on demand.
    pub fn generate(&self, val: &str, k: u32) -> Result<OffsetSequence, EncodeError> {
        let mut offsets = Vec::with_capacity(k.min(MAX_HASH_COUNT) as usize);
        if k == 0 {
            return Ok(OffsetSequence(offsets));
        }

        let mut current = self.encoder.encode(val)?;
        offsets.push(current);
        for _ in 1..k {
            current = self.encoder.encode(&current.to_string())?;
            offsets.push(current);
        }

        Ok(OffsetSequence(offsets))
    }
}

impl std::fmt::Debug for HashSequenceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashSequenceGenerator")
            .finish_non_exhaustive()
    }
}
