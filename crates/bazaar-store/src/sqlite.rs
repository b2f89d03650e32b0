//! SQLite implementation of the SaleStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite.
//! The connection is not shared between threads: every operation, read or
//! write, takes the same mutex for its whole duration.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use bazaar_core::{encode_transactions, Address, Contract, OrderState, TransactionRecord};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migration;
use crate::row::{decode_contract, decode_records, decode_state, FundingSnapshot, SaleRow};
use crate::traits::{
    Funding, PaymentLookup, SalePage, SaleQuery, SaleRecord, SaleStore, SaleSummary, UnfundedSale,
};

const INSERT_SALE: &str = "INSERT OR REPLACE INTO sales (
        orderID, contract, state, read, date, total, thumbnail, buyerID,
        buyerBlockchainID, title, shippingName, shippingAddress, paymentAddr,
        funded, transactions
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";

const SUMMARY_COLUMNS: &str = "orderID, date, title, thumbnail, total, buyerID,
        buyerBlockchainID, shippingName, shippingAddress, paymentAddr, state, read, funded";

/// Columns the free-text search of `list` looks at.
const SEARCH_COLUMNS: [&str; 7] = [
    "orderID",
    "title",
    "buyerID",
    "buyerBlockchainID",
    "shippingName",
    "shippingAddress",
    "paymentAddr",
];

/// SQLite-based sale store.
///
/// Thread-safe via internal Mutex.
pub struct SqliteSaleStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteSaleStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(&StoreConfig::new(path.as_ref()))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::open_with_config(&StoreConfig::in_memory())
    }

    /// Open a database as described by `config`.
    pub fn open_with_config(config: &StoreConfig) -> Result<Self> {
        let mut conn = match &config.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = Connection::open(path)?;
                let mode: String = conn.pragma_update_and_check(
                    None,
                    "journal_mode",
                    config.journal_mode.pragma_value(),
                    |row| row.get(0),
                )?;
                debug!(journal_mode = %mode, "configured journal mode");
                conn
            }
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout_duration())?;
        migration::migrate(&mut conn)?;

        info!(path = ?config.path, "opened sale store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(poisoned)?;
        f(&conn)
    }

    /// Execute an operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(poisoned)?;
        f(&mut conn)
    }
}

fn poisoned<T>(e: PoisonError<T>) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", e)),
    ))
}

// Contract and transaction columns may hold TEXT or BLOB depending on the writer.
fn bytes_column(row: &Row<'_>, idx: usize, name: &str) -> rusqlite::Result<Option<Vec<u8>>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Ok(Some(bytes.to_vec())),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            name.to_owned(),
            other.data_type(),
        )),
    }
}

fn flag_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(idx)? == 1)
}

fn read_funding(conn: &Connection, order_id: &str) -> Result<Option<FundingSnapshot>> {
    conn.query_row(
        "SELECT funded, transactions FROM sales WHERE orderID = ?1",
        params![order_id],
        |row| {
            Ok(FundingSnapshot {
                funded: flag_column(row, 0)?,
                transactions: bytes_column(row, 1, "transactions")?,
            })
        },
    )
    .optional()
    .map_err(StoreError::from)
}

fn summary_from_row(row: &Row<'_>) -> Result<SaleSummary> {
    Ok(SaleSummary {
        order_id: row.get(0)?,
        timestamp: row.get(1)?,
        title: row.get(2)?,
        thumbnail: row.get(3)?,
        total: row.get(4)?,
        buyer_id: row.get(5)?,
        buyer_blockchain_id: row.get(6)?,
        shipping_name: row.get(7)?,
        shipping_address: row.get(8)?,
        payment_address: row.get(9)?,
        state: decode_state(row.get(10)?)?,
        read: flag_column(row, 11)?,
        funded: flag_column(row, 12)?,
    })
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the WHERE clause of a list query and its positional parameters.
fn filter_clause(query: &SaleQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if !query.states.is_empty() {
        let marks = vec!["?"; query.states.len()].join(", ");
        clauses.push(format!("state IN ({})", marks));
        values.extend(query.states.iter().map(|s| Value::Integer(s.to_i64())));
    }

    if let Some(term) = query.search_term() {
        let pattern = format!("%{}%", escape_like(&term));
        let matches = SEARCH_COLUMNS
            .iter()
            .map(|column| format!("{} LIKE ? ESCAPE '\\'", column))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({})", matches));
        values.extend(SEARCH_COLUMNS.iter().map(|_| Value::Text(pattern.clone())));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

impl SaleStore for SqliteSaleStore {
    fn put(
        &self,
        order_id: &str,
        contract: &Contract,
        state: OrderState,
        read: bool,
    ) -> Result<()> {
        let row = SaleRow::derive(order_id, contract, state, read)?;

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            // Funding evidence survives contract rewrites.
            let funding = read_funding(&tx, order_id)?.unwrap_or_default();

            tx.execute(
                INSERT_SALE,
                params![
                    row.order_id,
                    row.contract,
                    row.state.to_i64(),
                    row.read as i64,
                    row.date,
                    row.total,
                    row.thumbnail,
                    row.buyer_id,
                    row.buyer_blockchain_id,
                    row.title,
                    row.shipping_name,
                    row.shipping_address,
                    row.payment_addr,
                    funding.funded as i64,
                    funding.transactions,
                ],
            )?;
            tx.commit()?;

            debug!(order_id, %state, funded = funding.funded, "stored sale");
            Ok(())
        })
    }

    fn mark_as_read(&self, order_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE sales SET read = 1 WHERE orderID = ?1",
                params![order_id],
            )?;
            debug!(order_id, changed, "marked sale as read");
            Ok(())
        })
    }

    fn update_funding(
        &self,
        order_id: &str,
        funded: bool,
        records: &[TransactionRecord],
    ) -> Result<()> {
        let serialized = encode_transactions(records).map_err(StoreError::encode)?;

        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE sales SET funded = ?1, transactions = ?2 WHERE orderID = ?3",
                params![funded as i64, serialized, order_id],
            )?;
            debug!(
                order_id,
                funded,
                records = records.len(),
                changed,
                "updated sale funding"
            );
            Ok(())
        })
    }

    fn delete(&self, order_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM sales WHERE orderID = ?1", params![order_id])?;
            debug!(order_id, changed, "deleted sale");
            Ok(())
        })
    }

    fn get_all(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT orderID FROM sales")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(ids)
        })
    }

    fn get_by_payment_address(&self, address: &dyn Address) -> Result<PaymentLookup> {
        let encoded = address.encode_address();
        if encoded.is_empty() {
            // Moderated sales store an empty address; it identifies nothing.
            return Err(StoreError::NotFound("empty payment address".into()));
        }

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT orderID, contract, state, funded, transactions FROM sales
                 WHERE paymentAddr = ?1
                 ORDER BY date ASC, orderID ASC
                 LIMIT 2",
            )?;
            let matches = stmt
                .query_map(params![encoded], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        bytes_column(row, 1, "contract")?,
                        row.get::<_, i64>(2)?,
                        flag_column(row, 3)?,
                        bytes_column(row, 4, "transactions")?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            if matches.len() > 1 {
                warn!(
                    address = %encoded,
                    chosen = %matches[0].0,
                    other = %matches[1].0,
                    "payment address shared by several sales; returning the earliest"
                );
            }

            let (_, contract, state, funded, transactions) = matches
                .into_iter()
                .next()
                .ok_or_else(|| StoreError::NotFound(format!("payment address {}", encoded)))?;

            Ok(PaymentLookup {
                contract: decode_contract(&contract.unwrap_or_default())?,
                state: decode_state(state)?,
                funded,
                transactions: decode_records(transactions.as_deref())?.unwrap_or_default(),
            })
        })
    }

    fn get_by_order_id(&self, order_id: &str) -> Result<SaleRecord> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT contract, state, read, funded, transactions FROM sales
                     WHERE orderID = ?1",
                    params![order_id],
                    |row| {
                        Ok((
                            bytes_column(row, 0, "contract")?,
                            row.get::<_, i64>(1)?,
                            flag_column(row, 2)?,
                            flag_column(row, 3)?,
                            bytes_column(row, 4, "transactions")?,
                        ))
                    },
                )
                .optional()?;

            let Some((contract, state, read, funded, transactions)) = row else {
                return Err(StoreError::NotFound(format!("order {}", order_id)));
            };

            Ok(SaleRecord {
                order_id: order_id.to_owned(),
                contract: decode_contract(&contract.unwrap_or_default())?,
                state: decode_state(state)?,
                read,
                funded,
                transactions: decode_records(transactions.as_deref())?.unwrap_or_default(),
            })
        })
    }

    fn get_funding(&self, order_id: &str) -> Result<Funding> {
        self.with_conn(|conn| {
            let snapshot = read_funding(conn, order_id)?
                .ok_or_else(|| StoreError::NotFound(format!("order {}", order_id)))?;

            Ok(Funding {
                funded: snapshot.funded,
                transactions: decode_records(snapshot.transactions.as_deref())?,
            })
        })
    }

    fn list(&self, query: &SaleQuery) -> Result<SalePage> {
        let (filter, mut values) = filter_clause(query);
        let direction = if query.ascending { "ASC" } else { "DESC" };

        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM sales{}", filter),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )?;

            // A negative LIMIT means no limit in SQLite; a negative OFFSET reads as 0,
            // so both saturate instead of wrapping.
            values.push(Value::Integer(
                query
                    .limit
                    .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
                    .unwrap_or(-1),
            ));
            values.push(Value::Integer(
                i64::try_from(query.offset).unwrap_or(i64::MAX),
            ));

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM sales{} ORDER BY date {dir}, orderID {dir} LIMIT ? OFFSET ?",
                SUMMARY_COLUMNS,
                filter,
                dir = direction
            ))?;
            let mut rows = stmt.query(params_from_iter(values.iter()))?;

            let mut sales = Vec::new();
            while let Some(row) = rows.next()? {
                sales.push(summary_from_row(row)?);
            }

            Ok(SalePage {
                sales,
                total: total as usize,
            })
        })
    }

    fn get_unfunded(&self) -> Result<Vec<UnfundedSale>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT orderID, date, paymentAddr FROM sales
                 WHERE funded = 0 AND paymentAddr != ''
                 ORDER BY date ASC, orderID ASC",
            )?;
            let unfunded = stmt
                .query_map([], |row| {
                    Ok(UnfundedSale {
                        order_id: row.get(0)?,
                        timestamp: row.get(1)?,
                        payment_address: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(unfunded)
        })
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
