// ==========================================
// Chem Procure - Tender Repository
// ==========================================
// Red line: no business logic, only data mapping. Status legality is
// enforced by the stage transition controller, never here.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::tender::{Specifications, Tender};
use crate::domain::types::{AgentType, TenderStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_date, fmt_utc, parse_date, parse_enum, parse_utc};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// Raw column values before typed conversion
struct TenderRow {
    tender_id: String,
    company_id: String,
    title: String,
    chemical_name: String,
    quantity: f64,
    unit: String,
    delivery_location: String,
    deadline: String,
    budget_range: String,
    specifications: String,
    status: String,
    current_agent: String,
    created_at: String,
    updated_at: String,
}

impl TenderRow {
    fn into_tender(self) -> RepositoryResult<Tender> {
        Ok(Tender {
            tender_id: self.tender_id,
            company_id: self.company_id,
            title: self.title,
            chemical_name: self.chemical_name,
            quantity: self.quantity,
            unit: self.unit,
            delivery_location: self.delivery_location,
            deadline: parse_date("deadline", &self.deadline)?,
            budget_range: self.budget_range,
            specifications: serde_json::from_str::<Specifications>(&self.specifications)?,
            status: parse_enum("status", &self.status, TenderStatus::parse)?,
            current_agent: parse_enum("current_agent", &self.current_agent, AgentType::parse)?,
            created_at: parse_utc("created_at", &self.created_at)?,
            updated_at: parse_utc("updated_at", &self.updated_at)?,
        })
    }
}

pub struct TenderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TenderRepository {
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

    /// Insert a tender created by intake.
    pub fn insert(&self, tender: &Tender) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO tender (
                tender_id, company_id, title, chemical_name, quantity, unit,
                delivery_location, deadline, budget_range, specifications,
                status, current_agent, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                tender.tender_id,
                tender.company_id,
                tender.title,
                tender.chemical_name,
                tender.quantity,
                tender.unit,
                tender.delivery_location,
                fmt_date(&tender.deadline),
                tender.budget_range,
                serde_json::to_string(&tender.specifications)?,
                tender.status.as_str(),
                tender.current_agent.as_str(),
                fmt_utc(&tender.created_at),
                fmt_utc(&tender.updated_at),
            ],
        )?;
        Ok(tender.tender_id.clone())
    }

    /// Single-or-none fetch by id.
    pub fn find_by_id(&self, tender_id: &str) -> RepositoryResult<Option<Tender>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT tender_id, company_id, title, chemical_name, quantity, unit,
                       delivery_location, deadline, budget_range, specifications,
                       status, current_agent, created_at, updated_at
                FROM tender WHERE tender_id = ?1
                "#,
                params![tender_id],
                |row| {
                    Ok(TenderRow {
                        tender_id: row.get(0)?,
                        company_id: row.get(1)?,
                        title: row.get(2)?,
                        chemical_name: row.get(3)?,
                        quantity: row.get(4)?,
                        unit: row.get(5)?,
                        delivery_location: row.get(6)?,
                        deadline: row.get(7)?,
                        budget_range: row.get(8)?,
                        specifications: row.get(9)?,
                        status: row.get(10)?,
                        current_agent: row.get(11)?,
                        created_at: row.get(12)?,
                        updated_at: row.get(13)?,
                    })
                },
            )
            .optional()?;

        row.map(TenderRow::into_tender).transpose()
    }

    /// Overwrite status/current_agent and bump updated_at.
    ///
    /// Returns the number of affected rows (0 when the tender is
    /// absent; the controller treats that as a silent no-op).
    pub fn update_status(
        &self,
        tender_id: &str,
        status: TenderStatus,
        current_agent: AgentType,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE tender SET status = ?2, current_agent = ?3, updated_at = ?4 WHERE tender_id = ?1",
            params![
                tender_id,
                status.as_str(),
                current_agent.as_str(),
                fmt_utc(&updated_at),
            ],
        )?;
        Ok(rows)
    }
}
