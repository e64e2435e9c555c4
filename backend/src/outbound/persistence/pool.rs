//! bb8-backed async connection pool for the Diesel repositories.
//!
//! Every Diesel adapter checks a connection out per operation rather than
//! holding one across awaits, so pool limits bound database concurrency
//! for the whole API surface and the chain sync worker together.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Pool construction and checkout failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be checked out within the configured timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool itself could not be built.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection pool settings.
///
/// Defaults suit a small service instance: up to 10 connections, 2 kept
/// idle, 30-second checkout timeout. Deployment overrides arrive through
/// the `APP_DB_POOL_*` settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Cloneable handle over the shared PostgreSQL pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the manager or pool cannot be
    /// constructed, e.g. for a malformed database URL.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check a connection out for one repository operation.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the pool is exhausted past its
    /// timeout or the database is unreachable.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_suit_a_single_instance() {
        let config = PoolConfig::new("postgres://localhost/launchpad");

        assert_eq!(config.database_url(), "postgres://localhost/launchpad");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, Some(2));
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn builder_overrides_apply() {
        let config = PoolConfig::new("postgres://localhost/launchpad")
            .with_max_size(32)
            .with_min_idle(None)
            .with_connection_timeout(Duration::from_secs(5));

        assert_eq!(config.max_size, 32);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn errors_carry_the_underlying_message() {
        assert!(
            PoolError::checkout("pool exhausted")
                .to_string()
                .contains("pool exhausted")
        );
        assert!(
            PoolError::build("bad url")
                .to_string()
                .contains("bad url")
        );
    }
}
