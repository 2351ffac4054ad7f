//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Offer the legacy drop-and-recreate upgrade as an explicit opt-in.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - `UpgradePolicy::Recreate` only destroys data when the stored version is
//!   older than `latest_version()`.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Tables owned by the migration set, dropped by `UpgradePolicy::Recreate`.
const OWNED_TABLES: &[&str] = &["tasks"];

/// How an out-of-date schema is brought to the latest version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpgradePolicy {
    /// Apply each pending migration step in order, keeping existing rows.
    #[default]
    Migrate,
    /// Drop every owned table and rebuild the schema from scratch.
    ///
    /// Loses all stored tasks. Kept for databases created by the legacy app,
    /// whose upgrade path was drop-and-recreate.
    Recreate,
}

impl UpgradePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::Recreate => "recreate",
        }
    }

    /// Parses `migrate|recreate` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "migrate" => Some(Self::Migrate),
            "recreate" => Some(Self::Recreate),
            _ => None,
        }
    }
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection, policy: UpgradePolicy) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let start_after = match policy {
        UpgradePolicy::Migrate => current_version,
        UpgradePolicy::Recreate => {
            for table in OWNED_TABLES {
                tx.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
            }
            warn!(
                "event=db_migrate module=db status=recreate from_version={current_version} to_version={latest}"
            );
            0
        }
    };

    for migration in MIGRATIONS {
        if migration.version <= start_after {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={current_version} to_version={latest} policy={}",
        policy.as_str()
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
