//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Filter parameters (m, k)
//! - Encode capabilities
//! - Chained offset derivation
//! - Atomic script definitions
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod encoder;
pub mod hash_sequence;
pub mod params;
pub mod script;

pub use config::{FilterConfig, FilterConfigBuilder};
pub use encoder::{EncoderKind, Murmur3Encoder, OffsetEncoder, Sha256Encoder, SipEncoder};
pub use hash_sequence::{HashSequenceGenerator, OffsetSequence};
pub use params::{FilterParams, MAX_BITMAP_BITS, MAX_HASH_COUNT};
pub use script::{ScriptInvocation, ScriptKind, CHECK_ALL_SET_LUA, SET_ALL_LUA};
