//! Redis bit store
//!
//! Bitmaps are plain Redis strings. Single-bit access uses `GETBIT` / `SETBIT`;
//! the atomic scripts run server-side through `EVALSHA` (falling back to
//! `EVAL` on a cold script cache), which Redis executes without interleaving
//! any other command.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError, Script};
use tracing::{debug, info};

use crate::domain::{ScriptInvocation, ScriptKind, CHECK_ALL_SET_LUA, SET_ALL_LUA};
use crate::error::StoreError;
use crate::ports::BitVectorStore;

/// Bit store backed by a Redis server
pub struct RedisBitStore {
    connection: MultiplexedConnection,
    check_all_set: Script,
    set_all: Script,
}

impl RedisBitStore {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/0`)
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(map_redis_error)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_error)?;

        info!(url = url, "Connected to Redis bit store");
        Ok(Self::with_connection(connection))
    }

    /// Wrap an existing connection; pooling and reconnects stay with the caller
    pub fn with_connection(connection: MultiplexedConnection) -> Self {
        Self {
            connection,
            check_all_set: Script::new(CHECK_ALL_SET_LUA),
            set_all: Script::new(SET_ALL_LUA),
        }
    }

    fn script(&self, kind: ScriptKind) -> &Script {
        match kind {
            ScriptKind::CheckAllSet => &self.check_all_set,
            ScriptKind::SetAll => &self.set_all,
        }
    }
}

/// IO-level failures are transport errors; everything the server rejects is a script error.
fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
    {
        StoreError::Transport(err.to_string())
    } else {
        StoreError::Script(err.to_string())
    }
}

#[async_trait]
impl BitVectorStore for RedisBitStore {
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let bit: u8 = redis::cmd("GETBIT")
            .arg(key)
            .arg(offset)
            .query_async(&mut connection)
            .await
            .map_err(map_redis_error)?;
        Ok(bit == 1)
    }

    async fn set_bit(&self, key: &str, offset: u64) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _previous: u8 = redis::cmd("SETBIT")
            .arg(key)
            .arg(offset)
            .arg(1)
            .query_async(&mut connection)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn atomic_eval(&self, invocation: &ScriptInvocation) -> Result<i64, StoreError> {
        let mut connection = self.connection.clone();
        let mut call = self.script(invocation.kind).key(invocation.key.as_str());
        call.arg(invocation.args());

        debug!(key = %invocation.key, script = %invocation.kind, "EVALSHA");
        call.invoke_async(&mut connection)
            .await
            .map_err(map_redis_error)
    }
}
