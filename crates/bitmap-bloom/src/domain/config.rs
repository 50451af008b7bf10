//! Filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use bitmap_bloom::domain::{EncoderKind, FilterConfigBuilder};
//!
//! let config = FilterConfigBuilder::new()
//!     .size_bits(1 << 20)
//!     .hash_count(5)
//!     .encoder(EncoderKind::Sha256)
//!     .call_timeout_ms(250)
//!     .build()
//!     .expect("Valid config");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::encoder::EncoderKind;
use super::params::FilterParams;
use crate::error::FilterError;

/// Membership filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Bitmap length in bits (m)
    pub size_bits: u64,
    /// Offsets per value (k)
    pub hash_count: u32,
    /// Encode capability used by the offset chain
    pub encoder: EncoderKind,
    /// Optional deadline for each store call
    pub call_timeout_ms: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            size_bits: 1 << 24, // 2 MiB bitmap
            hash_count: 3,
            encoder: EncoderKind::default(),
            call_timeout_ms: None,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(size_bits: u64, hash_count: u32, encoder: EncoderKind) -> Result<Self, FilterError> {
        let config = Self {
            size_bits,
            hash_count,
            encoder,
            call_timeout_ms: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FilterError::InvalidParameters(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        self.params().validate()?;

        if self.call_timeout_ms == Some(0) {
            return Err(FilterError::InvalidParameters(
                "call_timeout_ms must be positive when set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn params(&self) -> FilterParams {
        FilterParams {
            size_bits: self.size_bits,
            hash_count: self.hash_count,
        }
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Builder-style method to set the store call deadline
    pub fn with_call_timeout_ms(mut self, ms: u64) -> Self {
        self.call_timeout_ms = Some(ms);
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    size_bits: Option<u64>,
    hash_count: Option<u32>,
    encoder: Option<EncoderKind>,
    call_timeout_ms: Option<u64>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size_bits(mut self, bits: u64) -> Self {
        self.size_bits = Some(bits);
        self
    }

    pub fn hash_count(mut self, k: u32) -> Self {
        self.hash_count = Some(k);
        self
    }

    pub fn encoder(mut self, encoder: EncoderKind) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn call_timeout_ms(mut self, ms: u64) -> Self {
        self.call_timeout_ms = Some(ms);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> FilterConfig {
        let defaults = FilterConfig::default();

        FilterConfig {
            size_bits: self.size_bits.unwrap_or(defaults.size_bits),
            hash_count: self.hash_count.unwrap_or(defaults.hash_count),
            encoder: self.encoder.unwrap_or(defaults.encoder),
            call_timeout_ms: self.call_timeout_ms.or(defaults.call_timeout_ms),
        }
    }
}
