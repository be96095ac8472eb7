//! Append-only advice log.

use chrono::Utc;
use cropwise_core::{AdviceRequest, AdviceResult};
use rusqlite::params;
use tracing::debug;

use super::SqliteStore;
use crate::models::{AdviceLogEntry, LogEntryId, UserId};
use crate::traits::AdviceLog;
use crate::StoreResult;

impl AdviceLog for SqliteStore {
    fn record(
        &self,
        user_id: Option<UserId>,
        request: &AdviceRequest,
        result: &AdviceResult,
    ) -> StoreResult<LogEntryId> {
        let request_json = request.to_json()?;
        let advice_text = result.text();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO advice_logs (user_id, request_json, advice_text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, &request_json, &advice_text, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();

        debug!(log_id = id, user_id = ?user_id, "advice logged");
        Ok(id)
    }

    fn recent_entries(&self, limit: usize) -> StoreResult<Vec<AdviceLogEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, request_json, advice_text, created_at
            FROM advice_logs
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    row.get::<_, LogEntryId>(0)?,
                    row.get::<_, Option<UserId>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, chrono::DateTime<Utc>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, user_id, request_json, advice_text, created_at)| -> StoreResult<AdviceLogEntry> {
                Ok(AdviceLogEntry {
                    id,
                    user_id,
                    request: serde_json::from_str(&request_json)?,
                    advice_text,
                    created_at,
                })
            })
            .collect()
    }
}
