//! Filter parameters (m, k)
//!
//! Both values are fixed when the filter is built. The caller picks them;
//! nothing here estimates capacity or false-positive rates.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Largest bitmap a Redis string can address (512 MiB of bits)
pub const MAX_BITMAP_BITS: u64 = 1 << 32;

/// Upper bound on offsets per operation; every offset becomes one script argument
pub const MAX_HASH_COUNT: u32 = 1024;

/// Bitmap length and offsets-per-operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Bitmap length in bits (m)
    pub size_bits: u64,
    /// Number of offsets derived per value (k)
    pub hash_count: u32,
}

impl FilterParams {
    /// Create validated parameters
    pub fn new(size_bits: u64, hash_count: u32) -> Result<Self, FilterError> {
        let params = Self {
            size_bits,
            hash_count,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.size_bits == 0 {
            return Err(FilterError::InvalidParameters(
                "size_bits (m) must be at least 1".to_string(),
            ));
        }

        if self.size_bits > MAX_BITMAP_BITS {
            return Err(FilterError::InvalidParameters(format!(
                "size_bits (m) {} exceeds maximum {}",
                self.size_bits, MAX_BITMAP_BITS
            )));
        }

        if self.hash_count == 0 {
            return Err(FilterError::InvalidParameters(
                "hash_count (k) must be at least 1".to_string(),
            ));
        }

        if self.hash_count > MAX_HASH_COUNT {
            return Err(FilterError::InvalidParameters(format!(
                "hash_count (k) {} exceeds maximum {}",
                self.hash_count, MAX_HASH_COUNT
            )));
        }

        Ok(())
    }
}
