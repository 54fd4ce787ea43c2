// ==========================================
// Chem Procure - SQLite Connection Setup
// ==========================================
// Goals:
// - unify PRAGMA behavior across every Connection::open call so no
//   module runs with foreign keys off while another runs with them on
// - unify busy_timeout to reduce sporadic busy errors on concurrent
//   writes
// - own the schema DDL in one place
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must
/// be re-applied on every open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables if absent. Idempotent.
///
/// Timestamps are stored as RFC 3339 text, dates as YYYY-MM-DD text,
/// JSON payloads (specifications, messages, final_terms, log snapshots)
/// as serialized TEXT columns.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tender (
            tender_id         TEXT PRIMARY KEY,
            company_id        TEXT NOT NULL,
            title             TEXT NOT NULL,
            chemical_name     TEXT NOT NULL,
            quantity          REAL NOT NULL,
            unit              TEXT NOT NULL,
            delivery_location TEXT NOT NULL,
            deadline          TEXT NOT NULL,
            budget_range      TEXT NOT NULL,
            specifications    TEXT NOT NULL,
            status            TEXT NOT NULL,
            current_agent     TEXT NOT NULL,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vendor (
            vendor_id       TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            specializations TEXT NOT NULL,
            certifications  TEXT NOT NULL,
            rating          REAL NOT NULL,
            location        TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shortlisted_vendor (
            shortlist_id TEXT PRIMARY KEY,
            tender_id    TEXT NOT NULL REFERENCES tender(tender_id),
            vendor_id    TEXT NOT NULL REFERENCES vendor(vendor_id),
            fit_score    INTEGER NOT NULL CHECK (fit_score BETWEEN 0 AND 100),
            reasoning    TEXT NOT NULL,
            status       TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            UNIQUE (tender_id, vendor_id)
        );

        CREATE TABLE IF NOT EXISTS bid (
            bid_id             TEXT PRIMARY KEY,
            tender_id          TEXT NOT NULL REFERENCES tender(tender_id),
            vendor_id          TEXT NOT NULL REFERENCES vendor(vendor_id),
            initial_price      REAL NOT NULL,
            current_price      REAL NOT NULL,
            delivery_time_days INTEGER NOT NULL,
            terms              TEXT NOT NULL,
            status             TEXT NOT NULL,
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS negotiation (
            negotiation_id TEXT PRIMARY KEY,
            tender_id      TEXT NOT NULL REFERENCES tender(tender_id),
            vendor_id      TEXT NOT NULL REFERENCES vendor(vendor_id),
            bid_id         TEXT REFERENCES bid(bid_id),
            messages       TEXT NOT NULL,
            status         TEXT NOT NULL,
            final_terms    TEXT,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL,
            UNIQUE (tender_id, vendor_id)
        );

        CREATE TABLE IF NOT EXISTS auction (
            auction_id           TEXT PRIMARY KEY,
            tender_id            TEXT NOT NULL REFERENCES tender(tender_id),
            starting_price       REAL NOT NULL,
            current_lowest_price REAL NOT NULL,
            current_leader_id    TEXT REFERENCES vendor(vendor_id),
            start_time           TEXT NOT NULL,
            end_time             TEXT NOT NULL,
            status               TEXT NOT NULL,
            created_at           TEXT NOT NULL,
            UNIQUE (tender_id)
        );

        CREATE TABLE IF NOT EXISTS auction_bid (
            auction_bid_id TEXT PRIMARY KEY,
            auction_id     TEXT NOT NULL REFERENCES auction(auction_id),
            vendor_id      TEXT NOT NULL REFERENCES vendor(vendor_id),
            bid_amount     REAL NOT NULL,
            bid_ts         TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS evaluation (
            evaluation_id  TEXT PRIMARY KEY,
            tender_id      TEXT NOT NULL REFERENCES tender(tender_id),
            vendor_id      TEXT NOT NULL REFERENCES vendor(vendor_id),
            overall_score  INTEGER NOT NULL,
            price_score    INTEGER NOT NULL,
            quality_score  INTEGER NOT NULL,
            delivery_score INTEGER NOT NULL,
            recommendation TEXT NOT NULL,
            created_at     TEXT NOT NULL,
            UNIQUE (tender_id, vendor_id)
        );

        CREATE TABLE IF NOT EXISTS workflow_log (
            log_id      TEXT PRIMARY KEY,
            tender_id   TEXT NOT NULL,
            agent       TEXT NOT NULL,
            action      TEXT NOT NULL,
            input_json  TEXT NOT NULL,
            output_json TEXT NOT NULL,
            logged_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shortlist_tender ON shortlisted_vendor(tender_id, status);
        CREATE INDEX IF NOT EXISTS idx_bid_tender ON bid(tender_id, status);
        CREATE INDEX IF NOT EXISTS idx_auction_bid_auction ON auction_bid(auction_id, bid_amount);
        CREATE INDEX IF NOT EXISTS idx_workflow_log_tender ON workflow_log(tender_id);
        "#,
    )?;
    Ok(())
}
