// ==========================================
// Chem Procure - Shortlisted Vendor Repository
// ==========================================
// Rows are written once by the shortlisting stage; the only later
// mutation is the external pending→approved manager action.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::ApprovalStatus;
use crate::domain::vendor::ShortlistedVendor;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_enum, parse_utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

struct ShortlistRow {
    shortlist_id: String,
    tender_id: String,
    vendor_id: String,
    fit_score: i64,
    reasoning: String,
    status: String,
    created_at: String,
}

impl ShortlistRow {
    fn into_entity(self) -> RepositoryResult<ShortlistedVendor> {
        Ok(ShortlistedVendor {
            shortlist_id: self.shortlist_id,
            tender_id: self.tender_id,
            vendor_id: self.vendor_id,
            fit_score: self.fit_score,
            reasoning: self.reasoning,
            status: parse_enum("status", &self.status, ApprovalStatus::parse)?,
            created_at: parse_utc("created_at", &self.created_at)?,
        })
    }
}

pub struct ShortlistRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShortlistRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert the full shortlist for a tender in one transaction.
    pub fn insert_many(&self, entries: &[ShortlistedVendor]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for entry in entries {
            tx.execute(
                r#"
                INSERT INTO shortlisted_vendor (
                    shortlist_id, tender_id, vendor_id, fit_score, reasoning, status, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    entry.shortlist_id,
                    entry.tender_id,
                    entry.vendor_id,
                    entry.fit_score,
                    entry.reasoning,
                    entry.status.as_str(),
                    fmt_utc(&entry.created_at),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// Shortlist for a tender, highest fit score first (insertion order
    /// breaks ties, matching the stage's stable ranking).
    pub fn list_by_tender(&self, tender_id: &str) -> RepositoryResult<Vec<ShortlistedVendor>> {
        self.query_list(
            "SELECT shortlist_id, tender_id, vendor_id, fit_score, reasoning, status, created_at
             FROM shortlisted_vendor WHERE tender_id = ?1
             ORDER BY fit_score DESC, rowid ASC",
            tender_id,
        )
    }

    /// Only the entries a manager has approved for negotiation.
    pub fn list_approved(&self, tender_id: &str) -> RepositoryResult<Vec<ShortlistedVendor>> {
        self.query_list(
            "SELECT shortlist_id, tender_id, vendor_id, fit_score, reasoning, status, created_at
             FROM shortlisted_vendor WHERE tender_id = ?1 AND status = 'approved'
             ORDER BY fit_score DESC, rowid ASC",
            tender_id,
        )
    }

    /// External manager action: pending → approved.
    pub fn approve(&self, shortlist_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE shortlisted_vendor SET status = 'approved' WHERE shortlist_id = ?1",
            params![shortlist_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ShortlistedVendor".to_string(),
                id: shortlist_id.to_string(),
            });
        }
        Ok(())
    }

    fn query_list(&self, sql: &str, tender_id: &str) -> RepositoryResult<Vec<ShortlistedVendor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![tender_id], |row| {
            Ok(ShortlistRow {
                shortlist_id: row.get(0)?,
                tender_id: row.get(1)?,
                vendor_id: row.get(2)?,
                fit_score: row.get(3)?,
                reasoning: row.get(4)?,
                status: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entity()?);
        }
        Ok(entries)
    }
}
