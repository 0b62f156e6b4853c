//! Bounded Redis connection pool.
//!
//! - At most `max_active` connections are checked out at once. When every slot
//!   is taken, [`RedisPool::get`] fails immediately with
//!   [`RemoteError::PoolExhausted`] instead of waiting.
//! - At most `max_idle` connections are kept for reuse; idle connections older
//!   than `idle_timeout` are discarded.
//! - Reused connections are checked with `PING` before being handed out.
//! - Dial, read and write are bounded by `io_timeout`.

use std::time::Duration;

use parking_lot::Mutex;
use redis::{AsyncCommands, Client, RedisError, aio::MultiplexedConnection};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::domain::repositories::RemoteError;

/// Pool sizing and timeout settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_active: usize,
    pub max_idle: usize,
    pub idle_timeout: Duration,
    pub io_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_active: 1000,
            max_idle: 3,
            idle_timeout: Duration::from_secs(240),
            io_timeout: Duration::from_millis(250),
        }
    }
}

/// Snapshot of pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub active: usize,
    pub idle: usize,
}

struct IdleConnection {
    conn: MultiplexedConnection,
    idle_since: Instant,
}

pub struct RedisPool {
    client: Client,
    config: PoolConfig,
    permits: Semaphore,
    idle: Mutex<Vec<IdleConnection>>,
}

impl RedisPool {
    /// Creates a pool for `redis_url`. No connection is opened until first use.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] if the URL is invalid.
    pub fn new(redis_url: &str, config: PoolConfig) -> Result<Self, RemoteError> {
        let client = Client::open(redis_url).map_err(|e| {
            RemoteError::Transport(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            permits: Semaphore::new(config.max_active),
            idle: Mutex::new(Vec::with_capacity(config.max_idle)),
            config,
        })
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            active: self.config.max_active - self.permits.available_permits(),
            idle: self.idle.lock().len(),
        }
    }

    /// Checks out a connection, reusing a healthy idle one or dialing anew.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::PoolExhausted`] if `max_active` connections are in use
    /// - [`RemoteError::Transport`] if dialing fails or times out
    pub async fn get(&self) -> Result<PooledConnection<'_>, RemoteError> {
        let permit = self.try_permit()?;

        while let Some(idle) = self.pop_idle() {
            if idle.idle_since.elapsed() >= self.config.idle_timeout {
                debug!("Discarding Redis connection idle past timeout");
                continue;
            }

            let mut conn = idle.conn;
            let healthy = matches!(
                timeout(self.config.io_timeout, conn.ping::<()>()).await,
                Ok(Ok(()))
            );
            if healthy {
                return Ok(PooledConnection::new(self, conn, permit));
            }
            debug!("Discarding Redis connection that failed PING on borrow");
        }

        let conn = self.dial().await?;
        Ok(PooledConnection::new(self, conn, permit))
    }

    fn try_permit(&self) -> Result<SemaphorePermit<'_>, RemoteError> {
        self.permits.try_acquire().map_err(|_| {
            warn!("Redis connection pool exhausted");
            RemoteError::PoolExhausted
        })
    }

    fn pop_idle(&self) -> Option<IdleConnection> {
        self.idle.lock().pop()
    }

    async fn dial(&self) -> Result<MultiplexedConnection, RemoteError> {
        match timeout(
            self.config.io_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                warn!("Redis: connection error: {}", e);
                Err(RemoteError::Transport(format!("connect failed: {}", e)))
            }
            Err(_) => {
                warn!("Redis: connection timed out");
                Err(RemoteError::Transport("connect timed out".to_string()))
            }
        }
    }

    fn release(&self, conn: MultiplexedConnection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_idle {
            idle.push(IdleConnection {
                conn,
                idle_since: Instant::now(),
            });
        }
    }
}

/// A checked-out connection. Returned to the pool on drop unless it failed.
pub struct PooledConnection<'a> {
    pool: &'a RedisPool,
    conn: Option<MultiplexedConnection>,
    broken: bool,
    _permit: SemaphorePermit<'a>,
}

impl<'a> PooledConnection<'a> {
    fn new(pool: &'a RedisPool, conn: MultiplexedConnection, permit: SemaphorePermit<'a>) -> Self {
        Self {
            pool,
            conn: Some(conn),
            broken: false,
            _permit: permit,
        }
    }

    /// Issues `GET key` and returns the raw bytes. `Ok(None)` means the key
    /// has no value.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] on failure or timeout. Only I/O
    /// failures and timeouts discard the connection; a server error reply
    /// (e.g. `WRONGTYPE`) leaves it reusable.
    pub async fn get_value(&mut self, key: &str) -> Result<Option<Vec<u8>>, RemoteError> {
        let io_timeout = self.pool.config.io_timeout;
        let Some(conn) = self.conn.as_mut() else {
            return Err(RemoteError::Transport("connection unavailable".to_string()));
        };

        match timeout(io_timeout, conn.get::<_, Option<Vec<u8>>>(key)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if is_connection_error(&e) {
                    self.broken = true;
                }
                Err(RemoteError::Transport(format!("GET failed: {}", e)))
            }
            Err(_) => {
                self.broken = true;
                Err(RemoteError::Transport("GET timed out".to_string()))
            }
        }
    }

    /// Issues `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] on failure or timeout.
    pub async fn ping(&mut self) -> Result<(), RemoteError> {
        let io_timeout = self.pool.config.io_timeout;
        let Some(conn) = self.conn.as_mut() else {
            return Err(RemoteError::Transport("connection unavailable".to_string()));
        };

        let result = match timeout(io_timeout, conn.ping::<()>()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RemoteError::Transport(format!("PING failed: {}", e))),
            Err(_) => Err(RemoteError::Transport("PING timed out".to_string())),
        };

        if result.is_err() {
            self.broken = true;
        }
        result
    }
}

fn is_connection_error(e: &RedisError) -> bool {
    e.is_io_error() || e.is_connection_dropped() || e.is_timeout()
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take()
            && !self.broken
        {
            self.pool.release(conn);
        }
    }
}
