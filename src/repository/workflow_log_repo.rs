// ==========================================
// Chem Procure - Workflow Log Repository
// ==========================================
// Red line: every stage completion writes one entry.
// Write-only from the engine's point of view; list_by_tender exists
// for diagnostics and tests.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::AgentType;
use crate::domain::workflow_log::WorkflowLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_enum, parse_utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct WorkflowLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkflowLogRepository {
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

    pub fn insert(&self, log: &WorkflowLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO workflow_log (
                log_id, tender_id, agent, action, input_json, output_json, logged_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.log_id,
                log.tender_id,
                log.agent.as_str(),
                log.action,
                log.input_json.to_string(),
                log.output_json.to_string(),
                fmt_utc(&log.logged_at),
            ],
        )?;
        Ok(log.log_id.clone())
    }

    /// Audit trail for a tender in write order.
    pub fn list_by_tender(&self, tender_id: &str) -> RepositoryResult<Vec<WorkflowLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT log_id, tender_id, agent, action, input_json, output_json, logged_at \
             FROM workflow_log WHERE tender_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![tender_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (log_id, tender_id, agent, action, input_json, output_json, logged_at) = row?;
            logs.push(WorkflowLog {
                log_id,
                tender_id,
                agent: parse_enum("agent", &agent, AgentType::parse)?,
                action,
                input_json: serde_json::from_str(&input_json)?,
                output_json: serde_json::from_str(&output_json)?,
                logged_at: parse_utc("logged_at", &logged_at)?,
            });
        }
        Ok(logs)
    }
}
