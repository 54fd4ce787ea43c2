// ==========================================
// Chem Procure - Vendor Registry Repository
// ==========================================
// Read-mostly mirror of the external vendor registry. Tag lists are
// stored as JSON arrays in TEXT columns.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::vendor::Vendor;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

struct VendorRow {
    vendor_id: String,
    name: String,
    specializations: String,
    certifications: String,
    rating: f64,
    location: String,
    created_at: String,
}

impl VendorRow {
    fn into_vendor(self) -> RepositoryResult<Vendor> {
        Ok(Vendor {
            vendor_id: self.vendor_id,
            name: self.name,
            specializations: serde_json::from_str(&self.specializations)?,
            certifications: serde_json::from_str(&self.certifications)?,
            rating: self.rating,
            location: self.location,
            created_at: parse_utc("created_at", &self.created_at)?,
        })
    }
}

pub struct VendorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VendorRepository {
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

    pub fn insert(&self, vendor: &Vendor) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO vendor (
                vendor_id, name, specializations, certifications, rating, location, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                vendor.vendor_id,
                vendor.name,
                serde_json::to_string(&vendor.specializations)?,
                serde_json::to_string(&vendor.certifications)?,
                vendor.rating,
                vendor.location,
                fmt_utc(&vendor.created_at),
            ],
        )?;
        Ok(vendor.vendor_id.clone())
    }

    pub fn find_by_id(&self, vendor_id: &str) -> RepositoryResult<Option<Vendor>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT vendor_id, name, specializations, certifications, rating, location, created_at
                FROM vendor WHERE vendor_id = ?1
                "#,
                params![vendor_id],
                Self::map_row,
            )
            .optional()?;
        row.map(VendorRow::into_vendor).transpose()
    }

    /// Full registry scan in insertion order.
    ///
    /// Insertion order matters: shortlist ranking uses a stable sort,
    /// so equal fit scores keep registry order.
    pub fn list_all(&self) -> RepositoryResult<Vec<Vendor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT vendor_id, name, specializations, certifications, rating, location, created_at
            FROM vendor ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut vendors = Vec::new();
        for row in rows {
            vendors.push(row?.into_vendor()?);
        }
        Ok(vendors)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VendorRow> {
        Ok(VendorRow {
            vendor_id: row.get(0)?,
            name: row.get(1)?,
            specializations: row.get(2)?,
            certifications: row.get(3)?,
            rating: row.get(4)?,
            location: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}
