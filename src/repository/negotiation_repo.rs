// ==========================================
// Chem Procure - Negotiation Repository
// ==========================================
// The message thread is a JSON array column; appends are
// read-modify-write under the shared connection lock, which keeps the
// thread strictly ordered for this single-process engine.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::negotiation::{FinalTerms, Negotiation, NegotiationMessage};
use crate::domain::types::NegotiationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_enum, parse_utc};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

struct NegotiationRow {
    negotiation_id: String,
    tender_id: String,
    vendor_id: String,
    bid_id: Option<String>,
    messages: String,
    status: String,
    final_terms: Option<String>,
    created_at: String,
    updated_at: String,
}

impl NegotiationRow {
    fn into_entity(self) -> RepositoryResult<Negotiation> {
        Ok(Negotiation {
            negotiation_id: self.negotiation_id,
            tender_id: self.tender_id,
            vendor_id: self.vendor_id,
            bid_id: self.bid_id,
            messages: serde_json::from_str::<Vec<NegotiationMessage>>(&self.messages)?,
            status: parse_enum("status", &self.status, NegotiationStatus::parse)?,
            final_terms: self
                .final_terms
                .map(|raw| serde_json::from_str::<FinalTerms>(&raw))
                .transpose()?,
            created_at: parse_utc("created_at", &self.created_at)?,
            updated_at: parse_utc("updated_at", &self.updated_at)?,
        })
    }
}

const NEGOTIATION_COLUMNS: &str = "negotiation_id, tender_id, vendor_id, bid_id, messages, \
                                   status, final_terms, created_at, updated_at";

pub struct NegotiationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NegotiationRepository {
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

    pub fn insert(&self, negotiation: &Negotiation) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO negotiation (
                negotiation_id, tender_id, vendor_id, bid_id, messages,
                status, final_terms, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                negotiation.negotiation_id,
                negotiation.tender_id,
                negotiation.vendor_id,
                negotiation.bid_id,
                serde_json::to_string(&negotiation.messages)?,
                negotiation.status.as_str(),
                negotiation
                    .final_terms
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                fmt_utc(&negotiation.created_at),
                fmt_utc(&negotiation.updated_at),
            ],
        )?;
        Ok(negotiation.negotiation_id.clone())
    }

    pub fn find_by_id(&self, negotiation_id: &str) -> RepositoryResult<Option<Negotiation>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {NEGOTIATION_COLUMNS} FROM negotiation WHERE negotiation_id = ?1"
                ),
                params![negotiation_id],
                Self::map_row,
            )
            .optional()?;
        row.map(NegotiationRow::into_entity).transpose()
    }

    /// The 1:1 thread for a tender/vendor pair.
    pub fn find_by_tender_vendor(
        &self,
        tender_id: &str,
        vendor_id: &str,
    ) -> RepositoryResult<Option<Negotiation>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {NEGOTIATION_COLUMNS} FROM negotiation \
                     WHERE tender_id = ?1 AND vendor_id = ?2"
                ),
                params![tender_id, vendor_id],
                Self::map_row,
            )
            .optional()?;
        row.map(NegotiationRow::into_entity).transpose()
    }

    pub fn list_by_tender(&self, tender_id: &str) -> RepositoryResult<Vec<Negotiation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {NEGOTIATION_COLUMNS} FROM negotiation WHERE tender_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![tender_id], Self::map_row)?;

        let mut threads = Vec::new();
        for row in rows {
            threads.push(row?.into_entity()?);
        }
        Ok(threads)
    }

    /// Link the vendor's bid to their thread once submitted.
    pub fn link_bid(&self, negotiation_id: &str, bid_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE negotiation SET bid_id = ?2, updated_at = ?3 WHERE negotiation_id = ?1",
            params![negotiation_id, bid_id, fmt_utc(&Utc::now())],
        )?;
        Ok(rows)
    }

    /// Append one message to the thread. Append-only: existing entries
    /// are never rewritten.
    pub fn append_message(
        &self,
        negotiation_id: &str,
        message: &NegotiationMessage,
    ) -> RepositoryResult<Negotiation> {
        let mut negotiation =
            self.find_by_id(negotiation_id)?
                .ok_or_else(|| RepositoryError::NotFound {
                    entity: "Negotiation".to_string(),
                    id: negotiation_id.to_string(),
                })?;
        negotiation.messages.push(message.clone());
        negotiation.updated_at = Utc::now();

        let conn = self.get_conn()?;
        conn.execute(
            "UPDATE negotiation SET messages = ?2, updated_at = ?3 WHERE negotiation_id = ?1",
            params![
                negotiation_id,
                serde_json::to_string(&negotiation.messages)?,
                fmt_utc(&negotiation.updated_at),
            ],
        )?;
        Ok(negotiation)
    }

    /// Close the thread with the agreed terms. ongoing → completed is
    /// one-way; the engine verifies legality before calling.
    pub fn complete(
        &self,
        negotiation_id: &str,
        final_terms: &FinalTerms,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE negotiation SET status = ?2, final_terms = ?3, updated_at = ?4 \
             WHERE negotiation_id = ?1",
            params![
                negotiation_id,
                NegotiationStatus::Completed.as_str(),
                serde_json::to_string(final_terms)?,
                fmt_utc(&Utc::now()),
            ],
        )?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NegotiationRow> {
        Ok(NegotiationRow {
            negotiation_id: row.get(0)?,
            tender_id: row.get(1)?,
            vendor_id: row.get(2)?,
            bid_id: row.get(3)?,
            messages: row.get(4)?,
            status: row.get(5)?,
            final_terms: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}
