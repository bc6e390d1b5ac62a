//! Configuration shared by a client and all of its sessions.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::common::{Context, NamingConvention, DEFAULT_DATABASE, DELETED_AT};
use crate::errors::{ErrorKind, MogulError, MogulResult};

/// Client configuration.
///
/// Cheap to clone; clones share the same settings. Settings can only be
/// changed until the configuration is handed to a client, after which every
/// setter fails with `InvalidOperation`.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::ClientConfig;
///
/// let config = ClientConfig::new();
/// config.set_database("shop")?;
/// config.set_soft_delete_field("removed_at")?;
/// assert_eq!(config.database(), "shop");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    inner: Arc<ClientConfigInner>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        ClientConfig {
            inner: Arc::new(ClientConfigInner::new()),
        }
    }

    /// Database used by sessions that do not name one.
    pub fn database(&self) -> String {
        self.inner.database.read().clone()
    }

    /// Sets the default database.
    ///
    /// # Arguments
    ///
    /// * `database` - Non-empty database name
    ///
    /// # Returns
    ///
    /// `ValidationError` for an empty name, `InvalidOperation` once the
    /// configuration is in use.
    pub fn set_database(&self, database: &str) -> MogulResult<()> {
        self.inner.check_not_configured("database")?;
        if database.trim().is_empty() {
            log::error!("Database name cannot be empty");
            return Err(MogulError::new(
                "database name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        *self.inner.database.write() = database.to_string();
        Ok(())
    }

    pub fn naming(&self) -> NamingConvention {
        self.inner.naming.read().clone()
    }

    pub fn set_naming(&self, naming: NamingConvention) -> MogulResult<()> {
        self.inner.check_not_configured("naming convention")?;
        *self.inner.naming.write() = naming;
        Ok(())
    }

    /// Field stamped by soft deletes and tested by `soft`.
    pub fn soft_delete_field(&self) -> String {
        self.inner.soft_delete_field.read().clone()
    }

    pub fn set_soft_delete_field(&self, field: &str) -> MogulResult<()> {
        self.inner.check_not_configured("soft delete field")?;
        if field.trim().is_empty() {
            log::error!("Soft delete field cannot be empty");
            return Err(MogulError::new(
                "soft delete field cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        *self.inner.soft_delete_field.write() = field.to_string();
        Ok(())
    }

    /// Timeout applied to sessions that are not given a context.
    pub fn default_timeout(&self) -> Option<Duration> {
        *self.inner.default_timeout.read()
    }

    pub fn set_default_timeout(&self, timeout: Option<Duration>) -> MogulResult<()> {
        self.inner.check_not_configured("default timeout")?;
        if timeout.is_some_and(|t| t.is_zero()) {
            log::error!("Default timeout must be positive");
            return Err(MogulError::new(
                "default timeout must be positive",
                ErrorKind::ValidationError,
            ));
        }
        *self.inner.default_timeout.write() = timeout;
        Ok(())
    }

    /// A fresh context honouring the default timeout, if any.
    pub fn new_context(&self) -> Context {
        match self.default_timeout() {
            Some(timeout) => Context::with_timeout(timeout),
            None => Context::background(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_configured(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("database", &self.database())
            .field("soft_delete_field", &self.soft_delete_field())
            .field("default_timeout", &self.default_timeout())
            .finish()
    }
}

struct ClientConfigInner {
    configured: AtomicBool,
    database: RwLock<String>,
    naming: RwLock<NamingConvention>,
    soft_delete_field: RwLock<String>,
    default_timeout: RwLock<Option<Duration>>,
}

impl ClientConfigInner {
    fn new() -> Self {
        ClientConfigInner {
            configured: AtomicBool::new(false),
            database: RwLock::new(DEFAULT_DATABASE.to_string()),
            naming: RwLock::new(NamingConvention::default()),
            soft_delete_field: RwLock::new(DELETED_AT.to_string()),
            default_timeout: RwLock::new(None),
        }
    }

    fn check_not_configured(&self, setting: &str) -> MogulResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the client is built", setting);
            return Err(MogulError::new(
                &format!("{} cannot be changed after the client is built", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.database(), "test");
        assert_eq!(config.soft_delete_field(), "deleted_at");
        assert_eq!(config.default_timeout(), None);
        assert_eq!(config.naming().apply("UserAccount"), "user_account");
        assert!(config.new_context().deadline().is_none());
    }

    #[test]
    fn setters_validate() {
        let config = ClientConfig::new();
        assert_eq!(
            config.set_database(" ").unwrap_err().kind(),
            &ErrorKind::ValidationError
        );
        assert_eq!(
            config.set_soft_delete_field("").unwrap_err().kind(),
            &ErrorKind::ValidationError
        );
        assert!(config.set_default_timeout(Some(Duration::ZERO)).is_err());
        config.set_default_timeout(Some(Duration::from_secs(5))).unwrap();
        assert!(config.new_context().deadline().is_some());
    }

    #[test]
    fn clones_share_settings() {
        let config = ClientConfig::new();
        let clone = config.clone();
        clone.set_database("shop").unwrap();
        assert_eq!(config.database(), "shop");
    }

    #[test]
    fn frozen_after_configured() {
        let config = ClientConfig::new();
        config.mark_configured();
        let err = config.set_database("shop").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
        assert_eq!(config.database(), "test");
    }
}
