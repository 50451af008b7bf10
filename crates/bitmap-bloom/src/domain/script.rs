//! Atomic multi-bit scripts
//!
//! Two scripts run against one bitmap key as a single indivisible unit:
//!
//! - `CheckAllSet`: walks offsets `1..=k` in order, returns `0` at the first
//!   unset bit, `1` if every bit is set, and raises an error if a read fails.
//! - `SetAll`: sets offsets `1..=k` to 1 in order and returns `1`.
//!
//! Arguments travel as `ARGV = [k, offset_1, ..., offset_k]` with the bitmap
//! key as `KEYS[1]`. Stores with a scripting engine run the Lua sources below
//! verbatim; other stores must reproduce the same semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Lua source for the all-bits-set check
pub const CHECK_ALL_SET_LUA: &str = r#"
local bitmap = KEYS[1]
local count = tonumber(ARGV[1])
for i = 1, count do
  local bit = redis.call('GETBIT', bitmap, ARGV[1 + i])
  if not bit then
    return redis.error_reply('FAIL')
  end
  if bit == 0 then
    return 0
  end
end
return 1
"#;

/// Lua source for the set-every-bit write
pub const SET_ALL_LUA: &str = r#"
local bitmap = KEYS[1]
local count = tonumber(ARGV[1])
for i = 1, count do
  redis.call('SETBIT', bitmap, ARGV[1 + i], 1)
end
return 1
"#;

/// Which atomic script to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptKind {
    CheckAllSet,
    SetAll,
}

impl ScriptKind {
    pub fn lua_source(&self) -> &'static str {
        match self {
            ScriptKind::CheckAllSet => CHECK_ALL_SET_LUA,
            ScriptKind::SetAll => SET_ALL_LUA,
        }
    }

    /// Interpret a raw result code
    ///
    /// `CheckAllSet` maps `1 -> true`, `0 -> false`. `SetAll` accepts only `1`.
    /// Anything else is an error carrying the literal code.
    pub fn interpret(&self, raw: i64) -> Result<bool, FilterError> {
        match (self, raw) {
            (ScriptKind::CheckAllSet, 1) => Ok(true),
            (ScriptKind::CheckAllSet, 0) => Ok(false),
            (ScriptKind::SetAll, 1) => Ok(true),
            (script, value) => Err(FilterError::UnexpectedResult {
                script: *script,
                value,
            }),
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptKind::CheckAllSet => write!(f, "check-all-set"),
            ScriptKind::SetAll => write!(f, "set-all"),
        }
    }
}

/// One script call: kind, bitmap key, declared bit count and offsets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub kind: ScriptKind,
    pub key: String,
    /// Declared `k`; the script reads exactly this many offsets
    pub bit_count: u32,
    pub offsets: Vec<u64>,
}

impl ScriptInvocation {
    pub fn new(kind: ScriptKind, key: impl Into<String>, offsets: Vec<u64>) -> Self {
        Self {
            kind,
            key: key.into(),
            bit_count: offsets.len() as u32,
            offsets,
        }
    }

    /// The `ARGV` vector: `[k, offset_1, ..., offset_k]`
    pub fn args(&self) -> Vec<u64> {
        let mut args = Vec::with_capacity(self.offsets.len() + 1);
        args.push(u64::from(self.bit_count));
        args.extend_from_slice(&self.offsets);
        args
    }
}
