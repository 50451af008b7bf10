//! Encode capabilities: string -> integer
//!
//! The filter never hashes through hidden global state. An encoder is injected
//! at construction and must be deterministic across calls and processes,
//! otherwise `exist` and `set` disagree on bit positions for the same value.

use std::fmt;
use std::hash::Hasher;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use siphasher::sip::SipHasher13;

use crate::error::EncodeError;

/// One-way, deterministic mapping from a string to an integer
pub trait OffsetEncoder: Send + Sync {
    fn encode(&self, input: &str) -> Result<u64, EncodeError>;
}

/// Plain functions and closures work as encoders.
impl<F> OffsetEncoder for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    fn encode(&self, input: &str) -> Result<u64, EncodeError> {
        Ok(self(input))
    }
}

/// MurmurHash3 x64/128, lower 64 bits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Murmur3Encoder {
    seed: u32,
}

impl Murmur3Encoder {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl OffsetEncoder for Murmur3Encoder {
    fn encode(&self, input: &str) -> Result<u64, EncodeError> {
        let mut cursor = Cursor::new(input.as_bytes());
        let hash = murmur3::murmur3_x64_128(&mut cursor, self.seed)
            .map_err(|e| EncodeError(format!("murmur3: {}", e)))?;
        Ok(hash as u64)
    }
}

/// SHA-256, first 8 digest bytes read big-endian
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Encoder;

impl OffsetEncoder for Sha256Encoder {
    fn encode(&self, input: &str) -> Result<u64, EncodeError> {
        let digest = Sha256::digest(input.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Ok(u64::from_be_bytes(head))
    }
}

/// Keyed SipHash-1-3
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipEncoder {
    key0: u64,
    key1: u64,
}

impl SipEncoder {
    pub fn new(key0: u64, key1: u64) -> Self {
        Self { key0, key1 }
    }
}

impl OffsetEncoder for SipEncoder {
    fn encode(&self, input: &str) -> Result<u64, EncodeError> {
        let mut hasher = SipHasher13::new_with_keys(self.key0, self.key1);
        hasher.write(input.as_bytes());
        Ok(hasher.finish())
    }
}

/// Serializable encoder selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncoderKind {
    Murmur3 {
        #[serde(default)]
        seed: u32,
    },
    Sha256,
    Siphash {
        #[serde(default)]
        key0: u64,
        #[serde(default)]
        key1: u64,
    },
}

impl Default for EncoderKind {
    fn default() -> Self {
        EncoderKind::Murmur3 { seed: 0 }
    }
}

impl EncoderKind {
    /// Instantiate the encoder this kind names
    pub fn build(&self) -> Arc<dyn OffsetEncoder> {
        match *self {
            EncoderKind::Murmur3 { seed } => Arc::new(Murmur3Encoder::new(seed)),
            EncoderKind::Sha256 => Arc::new(Sha256Encoder),
            EncoderKind::Siphash { key0, key1 } => Arc::new(SipEncoder::new(key0, key1)),
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderKind::Murmur3 { .. } => write!(f, "murmur3"),
            EncoderKind::Sha256 => write!(f, "sha256"),
            EncoderKind::Siphash { .. } => write!(f, "siphash"),
        }
    }
}

/// Parses the bare names used in environment variables (default seeds / keys).
impl FromStr for EncoderKind {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "murmur3" | "murmur" => Ok(EncoderKind::Murmur3 { seed: 0 }),
            "sha256" => Ok(EncoderKind::Sha256),
            "siphash" | "sip" => Ok(EncoderKind::Siphash { key0: 0, key1: 0 }),
            other => Err(EncodeError(format!("unknown encoder: {}", other))),
        }
    }
}
