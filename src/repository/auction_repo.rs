// ==========================================
// Chem Procure - Auction Repositories
// ==========================================
// AuctionRepository owns the auction header row; AuctionBidRepository
// owns the append-only competitive bid records. Leader updates are
// last-write-wins by design (no compare-and-set guard; preserved
// source behavior, flagged for product clarification).
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::auction::{Auction, AuctionBid};
use crate::domain::types::AuctionStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_enum, parse_utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

struct AuctionRow {
    auction_id: String,
    tender_id: String,
    starting_price: f64,
    current_lowest_price: f64,
    current_leader_id: Option<String>,
    start_time: String,
    end_time: String,
    status: String,
    created_at: String,
}

impl AuctionRow {
    fn into_auction(self) -> RepositoryResult<Auction> {
        Ok(Auction {
            auction_id: self.auction_id,
            tender_id: self.tender_id,
            starting_price: self.starting_price,
            current_lowest_price: self.current_lowest_price,
            current_leader_id: self.current_leader_id,
            start_time: parse_utc("start_time", &self.start_time)?,
            end_time: parse_utc("end_time", &self.end_time)?,
            status: parse_enum("status", &self.status, AuctionStatus::parse)?,
            created_at: parse_utc("created_at", &self.created_at)?,
        })
    }
}

const AUCTION_COLUMNS: &str = "auction_id, tender_id, starting_price, current_lowest_price, \
                               current_leader_id, start_time, end_time, status, created_at";

// ==========================================
// AuctionRepository
// ==========================================
pub struct AuctionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuctionRepository {
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

    pub fn insert(&self, auction: &Auction) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO auction (
                auction_id, tender_id, starting_price, current_lowest_price,
                current_leader_id, start_time, end_time, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                auction.auction_id,
                auction.tender_id,
                auction.starting_price,
                auction.current_lowest_price,
                auction.current_leader_id,
                fmt_utc(&auction.start_time),
                fmt_utc(&auction.end_time),
                auction.status.as_str(),
                fmt_utc(&auction.created_at),
            ],
        )?;
        Ok(auction.auction_id.clone())
    }

    pub fn find_by_id(&self, auction_id: &str) -> RepositoryResult<Option<Auction>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {AUCTION_COLUMNS} FROM auction WHERE auction_id = ?1"),
                params![auction_id],
                Self::map_row,
            )
            .optional()?;
        row.map(AuctionRow::into_auction).transpose()
    }

    /// The tender's auction (1:1).
    pub fn find_by_tender(&self, tender_id: &str) -> RepositoryResult<Option<Auction>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {AUCTION_COLUMNS} FROM auction WHERE tender_id = ?1"),
                params![tender_id],
                Self::map_row,
            )
            .optional()?;
        row.map(AuctionRow::into_auction).transpose()
    }

    /// Overwrite the running low/leader after an accepted bid.
    /// Last-write-wins: two near-simultaneous bids race without a
    /// compare-and-set guard.
    pub fn record_leading_bid(
        &self,
        auction_id: &str,
        amount: f64,
        vendor_id: &str,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE auction SET current_lowest_price = ?2, current_leader_id = ?3 \
             WHERE auction_id = ?1",
            params![auction_id, amount, vendor_id],
        )?;
        Ok(rows)
    }

    pub fn set_status(&self, auction_id: &str, status: AuctionStatus) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE auction SET status = ?2 WHERE auction_id = ?1",
            params![auction_id, status.as_str()],
        )?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuctionRow> {
        Ok(AuctionRow {
            auction_id: row.get(0)?,
            tender_id: row.get(1)?,
            starting_price: row.get(2)?,
            current_lowest_price: row.get(3)?,
            current_leader_id: row.get(4)?,
            start_time: row.get(5)?,
            end_time: row.get(6)?,
            status: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

// ==========================================
// AuctionBidRepository
// ==========================================
// Append-only. No update or delete paths exist on purpose.
pub struct AuctionBidRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuctionBidRepository {
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

    pub fn insert(&self, bid: &AuctionBid) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO auction_bid (auction_bid_id, auction_id, vendor_id, bid_amount, bid_ts)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                bid.auction_bid_id,
                bid.auction_id,
                bid.vendor_id,
                bid.bid_amount,
                fmt_utc(&bid.bid_ts),
            ],
        )?;
        Ok(bid.auction_bid_id.clone())
    }

    /// All bids for an auction, lowest amount first (evaluation ranking
    /// order). Submission order breaks amount ties.
    pub fn list_by_auction_ascending(&self, auction_id: &str) -> RepositoryResult<Vec<AuctionBid>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT auction_bid_id, auction_id, vendor_id, bid_amount, bid_ts \
             FROM auction_bid WHERE auction_id = ?1 \
             ORDER BY bid_amount ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![auction_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut bids = Vec::new();
        for row in rows {
            let (auction_bid_id, auction_id, vendor_id, bid_amount, bid_ts) = row?;
            bids.push(AuctionBid {
                auction_bid_id,
                auction_id,
                vendor_id,
                bid_amount,
                bid_ts: parse_utc("bid_ts", &bid_ts)?,
            });
        }
        Ok(bids)
    }
}
