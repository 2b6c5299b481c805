//! Connectivity probe.
//!
//! A cheap TCP connect to a well-known endpoint, used only to decide
//! whether a drain attempt is worth making. It is advisory: the connection
//! provider's own classification remains authoritative for whether any
//! given write actually succeeds.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::config::ProbeConfig;

/// Lightweight reachability check, independent of the primary store
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    addr: String,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            addr: config.addr,
            timeout: config.timeout,
        }
    }

    /// Probe an explicit endpoint (tests, unusual deployments).
    pub fn with_endpoint(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Whether the network currently looks reachable.
    pub async fn is_network_reachable(&self) -> bool {
        let reachable = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await,
            Ok(Ok(_))
        );
        debug!(addr = %self.addr, reachable, "connectivity probe");
        reachable
    }
}

impl Default for ConnectivityProbe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}
