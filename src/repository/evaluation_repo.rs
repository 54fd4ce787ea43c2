// ==========================================
// Chem Procure - Evaluation Repository
// ==========================================
// Evaluations are written once per tender by the evaluation stage and
// never mutated afterwards.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::evaluation::Evaluation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{fmt_utc, parse_utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct EvaluationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EvaluationRepository {
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

    pub fn insert_many(&self, evaluations: &[Evaluation]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for eval in evaluations {
            tx.execute(
                r#"
                INSERT INTO evaluation (
                    evaluation_id, tender_id, vendor_id, overall_score,
                    price_score, quality_score, delivery_score, recommendation, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    eval.evaluation_id,
                    eval.tender_id,
                    eval.vendor_id,
                    eval.overall_score,
                    eval.price_score,
                    eval.quality_score,
                    eval.delivery_score,
                    eval.recommendation,
                    fmt_utc(&eval.created_at),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// Display order: best overall score first.
    pub fn list_by_tender(&self, tender_id: &str) -> RepositoryResult<Vec<Evaluation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT evaluation_id, tender_id, vendor_id, overall_score, price_score, \
                    quality_score, delivery_score, recommendation, created_at \
             FROM evaluation WHERE tender_id = ?1 \
             ORDER BY overall_score DESC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![tender_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut evaluations = Vec::new();
        for row in rows {
            let (
                evaluation_id,
                tender_id,
                vendor_id,
                overall_score,
                price_score,
                quality_score,
                delivery_score,
                recommendation,
                created_at,
            ) = row?;
            evaluations.push(Evaluation {
                evaluation_id,
                tender_id,
                vendor_id,
                overall_score,
                price_score,
                quality_score,
                delivery_score,
                recommendation,
                created_at: parse_utc("created_at", &created_at)?,
            });
        }
        Ok(evaluations)
    }
}
