//! Thin synchronous wrapper over a Redis connection providing the two
//! collaborators the Dispatch Client needs: a work-queue (Redis list, used
//! with blocking pop) and a shared key-value store.
//!
//! The source protocol is a direct-exchange message bus (AMQP) plus a
//! separate key-value store; Redis supplies both roles here through one
//! connection, which keeps the session's dependency surface to a single
//! external service.

use std::time::Duration;

use anyhow::{Context, Result};
use redis::Commands;

/// The two collaborators a Dispatch Client needs: a work queue and a
/// shared key-value store. Abstracted behind a trait so the client can be
/// exercised against an in-memory fake in tests.
pub trait MessageBus {
    fn kv_set(&mut self, key: &str, value: &str) -> Result<()>;
    fn kv_get(&mut self, key: &str) -> Result<Option<String>>;
    fn kv_del(&mut self, key: &str) -> Result<()>;
    fn queue_push(&mut self, queue: &str, value: &str) -> Result<()>;
    /// Blocking pop with a timeout; `Ok(None)` on timeout, matching the
    /// per-candidate deadline the dispatch client enforces.
    fn queue_blocking_pop(&mut self, queue: &str, timeout: Duration) -> Result<Option<String>>;
}

pub struct RedisBus {
    conn: redis::Connection,
}

impl RedisBus {
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("opening redis client")?;
        let conn = client
            .get_connection()
            .context("establishing redis connection")?;
        Ok(Self { conn })
    }
}

impl MessageBus for RedisBus {
    fn kv_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .set(key, value)
            .with_context(|| format!("SET {key}"))
    }

    fn kv_get(&mut self, key: &str) -> Result<Option<String>> {
        self.conn.get(key).with_context(|| format!("GET {key}"))
    }

    fn kv_del(&mut self, key: &str) -> Result<()> {
        self.conn.del(key).with_context(|| format!("DEL {key}"))
    }

    fn queue_push(&mut self, queue: &str, value: &str) -> Result<()> {
        self.conn
            .lpush(queue, value)
            .with_context(|| format!("LPUSH {queue}"))
    }

    fn queue_blocking_pop(&mut self, queue: &str, timeout: Duration) -> Result<Option<String>> {
        let secs = timeout.as_secs().max(1) as usize;
        let reply: Option<(String, String)> = self
            .conn
            .brpop(queue, secs)
            .with_context(|| format!("BRPOP {queue}"))?;
        Ok(reply.map(|(_, value)| value))
    }
}
