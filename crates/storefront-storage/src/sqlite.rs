//! SQLite durability for the cache.
//!
//! The in-memory graph is what readers see; SQLite is what survives a
//! restart. Every publish writes its change set here in one transaction,
//! and opening a cache rebuilds the graph from these rows.

use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::Arc;

use crate::graph::{Graph, StagedChanges};
use crate::records::{
    StorageRecord, StoredAttributeTerm, StoredCoupon, StoredOrder, StoredOrderStats,
    StoredProduct, StoredRefund, StoredShipmentTracking, StoredSiteVisitStats,
    StoredTopEarnerStats, StoredTrackingProviderGroup,
};
use crate::table::{SearchKey, Table};
use crate::StorageResult;

/// SQLite storage for record bodies and search results.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens a SQLite database at the given path, creating the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            ",
        )?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Creates an in-memory SQLite database.
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                kind TEXT NOT NULL,
                record_key TEXT NOT NULL,
                site_id INTEGER NOT NULL,
                body TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (kind, record_key)
            );

            CREATE INDEX IF NOT EXISTS idx_records_kind_site ON records(kind, site_id);

            CREATE TABLE IF NOT EXISTS search_results (
                kind TEXT NOT NULL,
                search_key TEXT NOT NULL,
                members TEXT NOT NULL,
                PRIMARY KEY (kind, search_key)
            );
            "#,
        )?;
        Ok(())
    }

    /// Rebuilds the whole graph from disk.
    pub fn load_graph(&self) -> StorageResult<Graph> {
        Ok(Graph {
            orders: Arc::new(self.load_table::<StoredOrder>()?),
            products: Arc::new(self.load_table::<StoredProduct>()?),
            coupons: Arc::new(self.load_table::<StoredCoupon>()?),
            refunds: Arc::new(self.load_table::<StoredRefund>()?),
            attribute_terms: Arc::new(self.load_table::<StoredAttributeTerm>()?),
            order_stats: Arc::new(self.load_table::<StoredOrderStats>()?),
            site_visit_stats: Arc::new(self.load_table::<StoredSiteVisitStats>()?),
            top_earner_stats: Arc::new(self.load_table::<StoredTopEarnerStats>()?),
            shipment_trackings: Arc::new(self.load_table::<StoredShipmentTracking>()?),
            tracking_provider_groups: Arc::new(self.load_table::<StoredTrackingProviderGroup>()?),
        })
    }

    fn load_table<R: StorageRecord>(&self) -> StorageResult<Table<R>> {
        let mut table = Table::default();

        let mut stmt = self
            .conn
            .prepare("SELECT body FROM records WHERE kind = ?1 ORDER BY record_key")?;
        let bodies = stmt.query_map(params![R::KIND.as_str()], |row| row.get::<_, String>(0))?;
        for body in bodies {
            let record: R = serde_json::from_str(&body?)?;
            table.insert_row(record);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT search_key, members FROM search_results WHERE kind = ?1")?;
        let searches = stmt.query_map(params![R::KIND.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for search in searches {
            let (key, members) = search?;
            let key: SearchKey = serde_json::from_str(&key)?;
            let members: Vec<R::Key> = serde_json::from_str(&members)?;
            table.insert_search(key, members);
        }

        Ok(table)
    }

    /// Writes a change set atomically.
    pub fn write(&mut self, changes: &StagedChanges) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        write_table::<StoredOrder>(&tx, changes)?;
        write_table::<StoredProduct>(&tx, changes)?;
        write_table::<StoredCoupon>(&tx, changes)?;
        write_table::<StoredRefund>(&tx, changes)?;
        write_table::<StoredAttributeTerm>(&tx, changes)?;
        write_table::<StoredOrderStats>(&tx, changes)?;
        write_table::<StoredSiteVisitStats>(&tx, changes)?;
        write_table::<StoredTopEarnerStats>(&tx, changes)?;
        write_table::<StoredShipmentTracking>(&tx, changes)?;
        write_table::<StoredTrackingProviderGroup>(&tx, changes)?;
        tx.commit()?;
        Ok(())
    }

    /// Number of persisted rows of one kind.
    #[cfg(test)]
    pub(crate) fn count<R: StorageRecord>(&self) -> StorageResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE kind = ?1",
            params![R::KIND.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn write_table<R: StorageRecord>(
    tx: &Transaction<'_>,
    changes: &StagedChanges,
) -> StorageResult<()> {
    let table = changes.table::<R>();
    if table.is_empty() {
        return Ok(());
    }
    let kind = R::KIND.as_str();

    for record in table.upserts() {
        let key = serde_json::to_string(&record.key())?;
        let body = serde_json::to_string(record)?;
        tx.execute(
            "INSERT INTO records (kind, record_key, site_id, body, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(kind, record_key) DO UPDATE SET
                site_id = excluded.site_id,
                body = excluded.body,
                updated_at = excluded.updated_at",
            params![
                kind,
                key,
                record.site_id(),
                body,
                record.meta().updated_at.timestamp_millis()
            ],
        )?;
    }

    for key in table.deletions() {
        let key = serde_json::to_string(key)?;
        tx.execute(
            "DELETE FROM records WHERE kind = ?1 AND record_key = ?2",
            params![kind, key],
        )?;
    }

    for (search_key, members) in table.search_updates() {
        tx.execute(
            "INSERT INTO search_results (kind, search_key, members) VALUES (?1, ?2, ?3)
             ON CONFLICT(kind, search_key) DO UPDATE SET members = excluded.members",
            params![
                kind,
                serde_json::to_string(search_key)?,
                serde_json::to_string(members)?
            ],
        )?;
    }

    Ok(())
}
