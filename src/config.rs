//! # Configuration
//!
//! Environment-driven settings for the primary store, the local cache file,
//! and the connectivity probe.
//!
//! Configuration problems are fatal for the operation that needed them and
//! are never converted into offline mode: a missing `DATABASE_URL` means the
//! operator has to fix the install, not that the network is down.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SyncError};

/// Default remote connect timeout; kept short so a dead network cannot stall
/// an interactive write for long
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default probe endpoint (Google public DNS, TCP)
const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:53";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Primary-store connection settings
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Hard cap on the initial connect attempt
    pub connect_timeout: Duration,
}

impl RemoteConfig {
    /// Load from the environment.
    ///
    /// `DATABASE_URL` is required. `PARISH_CONNECT_TIMEOUT_SECS` optionally
    /// overrides the connect timeout; a value that does not parse is a
    /// configuration error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| SyncError::configuration("DATABASE_URL is not set"))?;

        let connect_timeout = match std::env::var("PARISH_CONNECT_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    SyncError::configuration(format!(
                        "PARISH_CONNECT_TIMEOUT_SECS is not a number: {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            database_url,
            connect_timeout,
        })
    }
}

/// Connectivity probe settings
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// `host:port` the probe opens a TCP connection to
    pub addr: String,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_PROBE_ADDR.to_string(),
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl ProbeConfig {
    /// Load from the environment, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let addr = std::env::var("PARISH_PROBE_ADDR").unwrap_or(defaults.addr);
        let timeout = match std::env::var("PARISH_PROBE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    SyncError::configuration(format!(
                        "PARISH_PROBE_TIMEOUT_SECS is not a number: {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => defaults.timeout,
        };

        Ok(Self { addr, timeout })
    }
}

/// Path of the local cache file.
///
/// `PARISH_CACHE_PATH` overrides; otherwise the platform data directory is
/// used, with the temp directory as a last resort.
pub fn local_cache_path() -> PathBuf {
    if let Ok(path) = std::env::var("PARISH_CACHE_PATH") {
        return PathBuf::from(path);
    }

    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("parish-ledger");
    path.push("local_cache.db");
    path
}
