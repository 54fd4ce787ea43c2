// ==========================================
// Chem Procure - Bid Repository
// ==========================================
// initial_price is write-once; only current_price/status/updated_at
// change afterwards, and only through the negotiation engine.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::bid::{Bid, BidTerms};
use crate::domain::types::BidStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_enum, parse_utc};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

struct BidRow {
    bid_id: String,
    tender_id: String,
    vendor_id: String,
    initial_price: f64,
    current_price: f64,
    delivery_time_days: i64,
    terms: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl BidRow {
    fn into_bid(self) -> RepositoryResult<Bid> {
        Ok(Bid {
            bid_id: self.bid_id,
            tender_id: self.tender_id,
            vendor_id: self.vendor_id,
            initial_price: self.initial_price,
            current_price: self.current_price,
            delivery_time_days: self.delivery_time_days,
            terms: serde_json::from_str::<BidTerms>(&self.terms)?,
            status: parse_enum("status", &self.status, BidStatus::parse)?,
            created_at: parse_utc("created_at", &self.created_at)?,
            updated_at: parse_utc("updated_at", &self.updated_at)?,
        })
    }
}

const BID_COLUMNS: &str = "bid_id, tender_id, vendor_id, initial_price, current_price, \
                           delivery_time_days, terms, status, created_at, updated_at";

pub struct BidRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BidRepository {
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

    pub fn insert(&self, bid: &Bid) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO bid (
                bid_id, tender_id, vendor_id, initial_price, current_price,
                delivery_time_days, terms, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                bid.bid_id,
                bid.tender_id,
                bid.vendor_id,
                bid.initial_price,
                bid.current_price,
                bid.delivery_time_days,
                serde_json::to_string(&bid.terms)?,
                bid.status.as_str(),
                fmt_utc(&bid.created_at),
                fmt_utc(&bid.updated_at),
            ],
        )?;
        Ok(bid.bid_id.clone())
    }

    pub fn find_by_id(&self, bid_id: &str) -> RepositoryResult<Option<Bid>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {BID_COLUMNS} FROM bid WHERE bid_id = ?1"),
                params![bid_id],
                Self::map_row,
            )
            .optional()?;
        row.map(BidRow::into_bid).transpose()
    }

    /// The vendor's bid on a tender (latest, if they somehow hold more
    /// than one).
    pub fn find_by_tender_vendor(
        &self,
        tender_id: &str,
        vendor_id: &str,
    ) -> RepositoryResult<Option<Bid>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {BID_COLUMNS} FROM bid \
                     WHERE tender_id = ?1 AND vendor_id = ?2 \
                     ORDER BY rowid DESC LIMIT 1"
                ),
                params![tender_id, vendor_id],
                Self::map_row,
            )
            .optional()?;
        row.map(BidRow::into_bid).transpose()
    }

    /// Equality-filtered select, e.g. all accepted bids seeding an
    /// auction.
    pub fn list_by_tender_and_status(
        &self,
        tender_id: &str,
        status: BidStatus,
    ) -> RepositoryResult<Vec<Bid>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BID_COLUMNS} FROM bid WHERE tender_id = ?1 AND status = ?2 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![tender_id, status.as_str()], Self::map_row)?;

        let mut bids = Vec::new();
        for row in rows {
            bids.push(row?.into_bid()?);
        }
        Ok(bids)
    }

    /// Concession write: new current price + status in one update.
    pub fn update_price_and_status(
        &self,
        bid_id: &str,
        current_price: f64,
        status: BidStatus,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE bid SET current_price = ?2, status = ?3, updated_at = ?4 WHERE bid_id = ?1",
            params![bid_id, current_price, status.as_str(), fmt_utc(&updated_at)],
        )?;
        Ok(rows)
    }

    pub fn update_status(
        &self,
        bid_id: &str,
        status: BidStatus,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE bid SET status = ?2, updated_at = ?3 WHERE bid_id = ?1",
            params![bid_id, status.as_str(), fmt_utc(&updated_at)],
        )?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BidRow> {
        Ok(BidRow {
            bid_id: row.get(0)?,
            tender_id: row.get(1)?,
            vendor_id: row.get(2)?,
            initial_price: row.get(3)?,
            current_price: row.get(4)?,
            delivery_time_days: row.get(5)?,
            terms: row.get(6)?,
            status: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}
