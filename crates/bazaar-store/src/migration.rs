//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
        tracing::info!(from = current, to = CURRENT_VERSION, "migrated sales schema");
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: the sales table.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            orderID TEXT PRIMARY KEY NOT NULL,
            contract TEXT NOT NULL,           -- indented JSON contract document
            state INTEGER NOT NULL,           -- OrderState code
            read INTEGER NOT NULL,            -- 0/1
            date INTEGER NOT NULL,            -- buyer order timestamp, unix seconds
            total INTEGER NOT NULL,           -- payment amount
            thumbnail TEXT NOT NULL,
            buyerID TEXT NOT NULL,
            buyerBlockchainID TEXT NOT NULL,
            title TEXT NOT NULL,              -- lower-cased
            shippingName TEXT NOT NULL,       -- lower-cased, empty without shipping
            shippingAddress TEXT NOT NULL,    -- lower-cased, empty without shipping
            paymentAddr TEXT NOT NULL,        -- resolved payment address, may be empty
            funded INTEGER NOT NULL DEFAULT 0,
            transactions BLOB                 -- JSON transaction list, NULL until first funding update
        );

        CREATE INDEX IF NOT EXISTS idx_sales_payment_addr ON sales(paymentAddr);
        CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
