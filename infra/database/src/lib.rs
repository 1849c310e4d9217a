//! # Database Infrastructure
//!
//! Connection management and schema migrations for [SurrealDB](https://surrealdb.com).
//!
//! - **Engine agnostic**: `mem://`, `rocksdb://`, `ws://` and `http://` through the `any` engine.
//! - **Resilient startup**: health checks are retried with exponential backoff.
//! - **Slice migrations**: each feature slice contributes ordered [`Migration`] scripts that
//!   are applied once and checksum-verified on later starts.
//!
//! ## Example
//!
//! ```rust
//! use ohub_database::{Database, DatabaseError, Migration};
//!
//! const SCHEMA: Migration =
//!     Migration::new("demo", "0001", "DEFINE TABLE IF NOT EXISTS note SCHEMALESS;");
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("ohub", "orders")
//!         .migrations([SCHEMA])
//!         .init()
//!         .await?;
//!
//!     assert!(db.is_healthy().await);
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, DatabaseErrorExt};
use migrations::MigrationRunner;
pub use migrations::{Migration, MigrationReport};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{debug, info, instrument, warn};

const HEALTH_CHECK_ATTEMPTS: u32 = 3;
const HEALTH_CHECK_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// Cheap-to-clone `SurrealDB` handle bound to one namespace and database.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub fn namespace(&self) -> &str {
        &self.inner.ns
    }

    pub fn database(&self) -> &str {
        &self.inner.db
    }

    /// Returns `true` when the engine answers its health probe.
    pub async fn is_healthy(&self) -> bool {
        self.inner.instance.health().await.is_ok()
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    migrations: Vec<Migration>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Signs in as a root user after connecting.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Appends migrations; they run in the order given.
    pub fn migrations(mut self, migrations: impl IntoIterator<Item = Migration>) -> Self {
        self.migrations.extend(migrations);
        self
    }

    /// Connects, checks health, authenticates, selects the session and applies migrations.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if the url, namespace or database is missing or blank.
    /// * [`DatabaseError::Connection`] if the engine fails to start or remains unhealthy.
    /// * [`DatabaseError::Auth`] if the provided credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the session cannot be activated.
    /// * [`DatabaseError::Migration`] if a migration fails or its checksum changed.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = required(self.url, "URL")?;
        let ns = required(self.ns, "Namespace")?;
        let db = required(self.db, "Database")?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        let mut delay = HEALTH_CHECK_BACKOFF;
        for attempt in 1..=HEALTH_CHECK_ATTEMPTS {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == HEALTH_CHECK_ATTEMPTS {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        let report = MigrationRunner::new(&instance).run(&self.migrations).await?;
        for key in &report.skipped {
            debug!(migration = %key, "Migration already applied");
        }
        for key in &report.applied {
            info!(migration = %key, "Applied migration");
        }
        info!(applied = report.applied.len(), skipped = report.skipped.len(), "Migrations complete");

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, DatabaseError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DatabaseError::Validation { message: format!("{name} is required").into(), context: None }),
    }
}
