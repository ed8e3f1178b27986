//! Configuration for the analysis server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `MINIMAX_BIND_ADDR`          (default: "0.0.0.0")
//! - `MINIMAX_PORT`               (default: "8000")
//! - `WEBSOCKET_CONNECTION_LIMIT` (default: "1000")
//! - `WORKER_LIMIT`               (default: available cores - 1, at least 1)
//! - `TASK_TIMEOUT`               (seconds, default: "5")
//! - `MINIMAX_WORKER_BINARY`      (default: this executable)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::Semaphore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously open sessions.
    pub session_limit: usize,

    /// Maximum number of analyses running at once.
    pub worker_limit: usize,

    /// Wall-clock budget per analysis.
    pub task_timeout: Duration,

    /// Program spawned (with the `worker` argument) to run one analysis.
    pub worker_binary: PathBuf,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("MINIMAX_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("MINIMAX_PORT", 8000u16)?;
        let session_limit = check_limit(
            "WEBSOCKET_CONNECTION_LIMIT",
            read_env_or_default("WEBSOCKET_CONNECTION_LIMIT", 1000usize)?,
            0,
        )?;
        let worker_limit = check_limit(
            "WORKER_LIMIT",
            read_env_or_default("WORKER_LIMIT", default_worker_limit())?,
            1,
        )?;
        let timeout_secs = read_env_or_default("TASK_TIMEOUT", 5u64)?;

        let worker_binary = match env::var_os("MINIMAX_WORKER_BINARY") {
            Some(path) => PathBuf::from(path),
            None => env::current_exe().context("locating the worker binary")?,
        };

        Ok(Config {
            bind_addr,
            port,
            session_limit,
            worker_limit,
            task_timeout: Duration::from_secs(timeout_secs),
            worker_binary,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// One core is left for the sessions and the runtime.
pub fn default_worker_limit() -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cores.saturating_sub(1).max(1)
}

/// Limits become semaphore sizes, so they must fit in a `Semaphore`.
fn check_limit(key: &str, value: usize, min: usize) -> Result<usize> {
    if value < min || value > Semaphore::MAX_PERMITS {
        bail!(
            "invalid value {} for {}: expected {}..={}",
            value,
            key,
            min,
            Semaphore::MAX_PERMITS
        );
    }
    Ok(value)
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value {:?} for {}", val, key)),
        Err(_) => Ok(default),
    }
}
