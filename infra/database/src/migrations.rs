use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Creates the bookkeeping table that records every applied migration.
const BOOTSTRAP: &str = "
DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS migration_slice_version ON migration FIELDS slice, version UNIQUE;
";

/// A schema script owned by a feature slice.
///
/// Migrations are applied in the order they are handed to the builder. Once applied, the
/// script must not change: its SHA-256 checksum is verified on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex encoded SHA-256 of the script.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.script.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run, as `slice:version` keys.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    #[must_use]
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        ensure_unique(migrations)?;

        self.db
            .query(BOOTSTRAP)
            .await
            .context("Bootstrapping migration table")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Bootstrapping migration table")?;

        let applied = self.applied_migrations().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            let checksum = migration.checksum();

            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum, &checksum)?;
                report.skipped.push(migration.key());
                continue;
            }

            self.apply(migration, checksum).await?;
            report.applied.push(migration.key());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration, checksum: String) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum))
            .await
            .and_then(|response| response.check().map_err(surrealdb::Error::from))
            .map_err(|e| DatabaseError::Migration {
                message: e.to_string().into(),
                context: Some(format!("Applying {}", migration.key()).into()),
            })?;

        Ok(())
    }

    async fn applied_migrations(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_unique(migrations: &[Migration]) -> Result<(), DatabaseError> {
    let mut seen = FxHashSet::default();
    for migration in migrations {
        if !seen.insert(migration.key()) {
            return Err(DatabaseError::Migration {
                message: format!("Duplicate migration {}", migration.key()).into(),
                context: None,
            });
        }
    }
    Ok(())
}

fn ensure_checksum_match(
    migration: &Migration,
    recorded: &str,
    current: &str,
) -> Result<(), DatabaseError> {
    if recorded != current {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {recorded}, current {current})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different contents".into()),
        });
    }
    Ok(())
}
