// ==========================================
// Chem Procure - Row Mapping Helpers
// ==========================================
// Shared text <-> typed conversions for the repositories. Timestamps
// are stored as RFC 3339, dates as YYYY-MM-DD.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};

pub(crate) fn fmt_utc(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_utc(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("invalid timestamp '{raw}': {e}"),
        })
}

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(field: &str, raw: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("invalid date '{raw}': {e}"),
    })
}

/// Map a stored status string through the enum's parse fn, surfacing a
/// field-level error for anything unrecognized.
pub(crate) fn parse_enum<T>(
    field: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> RepositoryResult<T> {
    parse(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("unrecognized value '{raw}'"),
    })
}
