//! PostgreSQL connection provider.

use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{classify_remote_error, Result, SyncError};
use crate::remote::{PgSession, PrimaryStore};

/// Connection provider for the primary PostgreSQL store
#[derive(Debug, Clone)]
pub struct PgPrimary {
    config: RemoteConfig,
}

impl PgPrimary {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    /// Provider built straight from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(RemoteConfig::from_env()?))
    }
}

impl PrimaryStore for PgPrimary {
    type Session = PgSession;

    /// Open one dedicated connection.
    ///
    /// The attempt is capped by the configured timeout so a dead network
    /// cannot stall an interactive caller; an elapsed timeout is an
    /// unreachable-store signal, not a query failure.
    async fn connect(&self) -> Result<Self::Session> {
        let options: PgConnectOptions = self
            .config
            .database_url
            .parse()
            .map_err(|e| SyncError::configuration(format!("invalid DATABASE_URL: {e}")))?;

        debug!(timeout = ?self.config.connect_timeout, "connecting to primary store");

        match tokio::time::timeout(
            self.config.connect_timeout,
            PgConnection::connect_with(&options),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(PgSession::new(conn)),
            Ok(Err(err)) => Err(classify_remote_error(err)),
            Err(_) => Err(SyncError::unreachable(format!(
                "connect attempt exceeded {:?}",
                self.config.connect_timeout
            ))),
        }
    }
}
