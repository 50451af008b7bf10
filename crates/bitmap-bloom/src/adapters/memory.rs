//! In-process bit store
//!
//! Stands in for a remote bitmap server inside one process (tests, local runs).
//! Bitmaps behave like Redis strings used as bit arrays: they start empty,
//! grow in whole bytes when a bit past the end is written, read unwritten bits
//! as 0, and number bits most-significant-first within each byte.

use async_trait::async_trait;
use bitvec::prelude::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::trace;

use crate::domain::{ScriptInvocation, ScriptKind};
use crate::error::StoreError;
use crate::ports::BitVectorStore;

/// Highest addressable bit (a bitmap is capped at 512 MiB)
pub const MAX_BIT_OFFSET: u64 = (1 << 32) - 1;

type Bitmap = BitVec<u8, Msb0>;

/// Bit store held in local memory
///
/// One lock guards every bitmap. Scripts run entirely under a single guard,
/// which makes each `atomic_eval` indivisible with respect to all other calls.
#[derive(Default)]
pub struct InMemoryBitStore {
    bitmaps: RwLock<HashMap<String, Bitmap>>,
}

impl InMemoryBitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of a bitmap, as a `GET` on the key would return them
    pub async fn raw_bytes(&self, key: &str) -> Option<Vec<u8>> {
        let bitmaps = self.bitmaps.read().await;
        bitmaps.get(key).map(|bits| bits.as_raw_slice().to_vec())
    }

    /// Number of set bits under `key`
    pub async fn count_ones(&self, key: &str) -> usize {
        let bitmaps = self.bitmaps.read().await;
        bitmaps.get(key).map_or(0, |bits| bits.count_ones())
    }

    fn check_offset(offset: u64) -> Result<usize, StoreError> {
        if offset > MAX_BIT_OFFSET {
            return Err(StoreError::Script(format!(
                "bit offset {} is out of range",
                offset
            )));
        }
        Ok(offset as usize)
    }

    fn read_bit(bits: Option<&Bitmap>, index: usize) -> bool {
        bits.and_then(|b| b.get(index).map(|bit| *bit))
            .unwrap_or(false)
    }

    fn write_bit(bits: &mut Bitmap, index: usize) {
        if index >= bits.len() {
            let bytes = index / 8 + 1;
            bits.resize(bytes * 8, false);
        }
        bits.set(index, true);
    }

    /// Offsets the script will actually read: the first `bit_count` of them
    fn declared_offsets(invocation: &ScriptInvocation) -> Result<Vec<usize>, StoreError> {
        let count = invocation.bit_count as usize;
        if count > invocation.offsets.len() {
            return Err(StoreError::Script(format!(
                "script declares {} offsets but received {}",
                count,
                invocation.offsets.len()
            )));
        }

        invocation.offsets[..count]
            .iter()
            .map(|&offset| Self::check_offset(offset))
            .collect()
    }
}

#[async_trait]
impl BitVectorStore for InMemoryBitStore {
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool, StoreError> {
        let index = Self::check_offset(offset)?;
        let bitmaps = self.bitmaps.read().await;
        Ok(Self::read_bit(bitmaps.get(key), index))
    }

    async fn set_bit(&self, key: &str, offset: u64) -> Result<(), StoreError> {
        let index = Self::check_offset(offset)?;
        let mut bitmaps = self.bitmaps.write().await;
        Self::write_bit(bitmaps.entry(key.to_string()).or_default(), index);
        Ok(())
    }

    async fn atomic_eval(&self, invocation: &ScriptInvocation) -> Result<i64, StoreError> {
        let offsets = Self::declared_offsets(invocation)?;

        match invocation.kind {
            ScriptKind::CheckAllSet => {
                let bitmaps = self.bitmaps.read().await;
                let bits = bitmaps.get(&invocation.key);
                for index in offsets {
                    if !Self::read_bit(bits, index) {
                        trace!(key = %invocation.key, offset = index, "check-all-set hit unset bit");
                        return Ok(0);
                    }
                }
                Ok(1)
            }
            ScriptKind::SetAll => {
                let mut bitmaps = self.bitmaps.write().await;
                let bits = bitmaps.entry(invocation.key.clone()).or_default();
                for index in offsets {
                    Self::write_bit(bits, index);
                }
                Ok(1)
            }
        }
    }
}
