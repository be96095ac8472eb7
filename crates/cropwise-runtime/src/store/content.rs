//! Posts, answers, the point ledger and reference tables.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::info;

use super::SqliteStore;
use crate::models::{
    Answer, AnswerId, NewPost, PointAward, PointTransaction, PostFilter, PostId, PostSummary,
    ReferenceEntry, ReferenceId, ReferenceKind, ReferenceRecord, TransactionId, UserId,
};
use crate::traits::ContentStore;
use crate::{StoreError, StoreResult};

const POST_COLUMNS: &str = r#"
    SELECT p.id, p.user_id, u.username, p.title, p.crop, p.content, p.created_at
    FROM posts p LEFT JOIN users u ON p.user_id = u.id
"#;

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostSummary> {
    Ok(PostSummary {
        id: row.get(0)?,
        author_id: row.get(1)?,
        author: row.get(2)?,
        title: row.get(3)?,
        crop: row.get(4)?,
        content: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn validate_post(post: &NewPost) -> StoreResult<NewPost> {
    let post = post.trimmed();
    if post.title.is_empty() || post.content.is_empty() {
        return Err(StoreError::Validation("title and content are required".to_string()));
    }
    Ok(post)
}

/// Balance update plus ledger insert. Caller owns the transaction.
fn apply_award(conn: &Connection, user_id: UserId, award: &PointAward) -> StoreResult<TransactionId> {
    let updated = conn.execute(
        "UPDATE users SET points = points + ?1 WHERE id = ?2",
        params![award.points, user_id],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound(format!("user {}", user_id)));
    }

    conn.execute(
        "INSERT INTO point_transactions (user_id, points, reason, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, award.points, &award.reason, Utc::now()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn post_exists(conn: &Connection, id: PostId) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM posts WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn reference_from_row(kind: ReferenceKind, row: &Row<'_>) -> rusqlite::Result<ReferenceEntry> {
    let record = match kind {
        ReferenceKind::Weather => ReferenceRecord::Weather {
            location: row.get(1)?,
            forecast: row.get(2)?,
        },
        ReferenceKind::CropCare => ReferenceRecord::CropCare {
            crop_name: row.get(1)?,
            technique: row.get(2)?,
        },
        ReferenceKind::Price => ReferenceRecord::Price {
            crop_name: row.get(1)?,
            price: row.get(2)?,
        },
        ReferenceKind::Scheme => ReferenceRecord::Scheme {
            scheme_name: row.get(1)?,
            details: row.get(2)?,
        },
    };

    Ok(ReferenceEntry {
        id: row.get(0)?,
        record,
        created_at: row.get(3)?,
    })
}

fn reference_columns(kind: ReferenceKind) -> (&'static str, &'static str) {
    match kind {
        ReferenceKind::Weather => ("location", "forecast"),
        ReferenceKind::CropCare => ("crop_name", "technique"),
        ReferenceKind::Price => ("crop_name", "price"),
        ReferenceKind::Scheme => ("scheme_name", "details"),
    }
}

impl ContentStore for SqliteStore {
    fn create_post(
        &self,
        author: Option<UserId>,
        post: &NewPost,
        award: Option<&PointAward>,
    ) -> StoreResult<PostId> {
        let post = validate_post(post)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO posts (user_id, title, crop, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![author, &post.title, &post.crop, &post.content, Utc::now()],
        )?;
        let id = tx.last_insert_rowid();

        if let (Some(user_id), Some(award)) = (author, award) {
            apply_award(&tx, user_id, award)?;
        }
        tx.commit()?;

        info!(post_id = id, author = ?author, crop = %post.crop, "post created");
        Ok(id)
    }

    fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<PostSummary>> {
        let mut sql = String::from(POST_COLUMNS);
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        // Both sides go through SQLite's lower() so non-ASCII text matches itself.
        if let Some(keyword) = &filter.keyword {
            values.push(Value::Text(keyword.clone()));
            let n = values.len();
            clauses.push(format!(
                "(instr(lower(p.title), lower(?{n})) > 0 OR instr(lower(p.content), lower(?{n})) > 0)"
            ));
        }
        if let Some(crop) = &filter.crop {
            values.push(Value::Text(crop.clone()));
            clauses.push(format!("instr(lower(p.crop), lower(?{})) > 0", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");
        if let Some(limit) = filter.limit {
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            sql.push_str(&format!(" LIMIT ?{}", values.len()));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let posts = stmt
            .query_map(params_from_iter(values.iter()), post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn get_post(&self, id: PostId) -> StoreResult<Option<PostSummary>> {
        let conn = self.conn.lock();
        let sql = format!("{} WHERE p.id = ?1", POST_COLUMNS);
        let post = conn.query_row(&sql, params![id], post_from_row).optional()?;
        Ok(post)
    }

    fn update_post(&self, id: PostId, post: &NewPost) -> StoreResult<()> {
        let post = validate_post(post)?;

        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE posts SET title = ?1, crop = ?2, content = ?3 WHERE id = ?4",
            params![&post.title, &post.crop, &post.content, id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("post {}", id)));
        }

        info!(post_id = id, "post updated");
        Ok(())
    }

    fn delete_post(&self, id: PostId) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let answers = tx.execute("DELETE FROM answers WHERE post_id = ?1", params![id])?;
        let removed = tx.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("post {}", id)));
        }
        tx.commit()?;

        info!(post_id = id, answers_removed = answers, "post deleted");
        Ok(())
    }

    fn create_answer(
        &self,
        post_id: PostId,
        author: Option<UserId>,
        content: &str,
        award: Option<&PointAward>,
    ) -> StoreResult<AnswerId> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::Validation("answer content is required".to_string()));
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if !post_exists(&tx, post_id)? {
            return Err(StoreError::NotFound(format!("post {}", post_id)));
        }
        tx.execute(
            "INSERT INTO answers (post_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![post_id, author, content, Utc::now()],
        )?;
        let id = tx.last_insert_rowid();

        if let (Some(user_id), Some(award)) = (author, award) {
            apply_award(&tx, user_id, award)?;
        }
        tx.commit()?;

        info!(answer_id = id, post_id, author = ?author, "answer created");
        Ok(id)
    }

    fn list_answers(&self, post_id: PostId) -> StoreResult<Vec<Answer>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT a.id, a.post_id, a.user_id, u.username, a.content, a.created_at
            FROM answers a LEFT JOIN users u ON a.user_id = u.id
            WHERE a.post_id = ?1
            ORDER BY a.created_at ASC, a.id ASC
            "#,
        )?;
        let answers = stmt
            .query_map(params![post_id], |row| {
                Ok(Answer {
                    id: row.get(0)?,
                    post_id: row.get(1)?,
                    author_id: row.get(2)?,
                    author: row.get(3)?,
                    content: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(answers)
    }

    fn award_points(&self, user_id: UserId, award: &PointAward) -> StoreResult<TransactionId> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let id = apply_award(&tx, user_id, award)?;
        tx.commit()?;

        info!(user_id, points = award.points, reason = %award.reason, "points awarded");
        Ok(id)
    }

    fn list_transactions(&self, user_id: UserId) -> StoreResult<Vec<PointTransaction>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, points, reason, created_at
            FROM point_transactions
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let transactions = stmt
            .query_map(params![user_id], |row| {
                Ok(PointTransaction {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    points: row.get(2)?,
                    reason: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn point_balance(&self, user_id: UserId) -> StoreResult<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT points FROM users WHERE id = ?1", params![user_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user_id)))
    }

    fn add_reference(&self, record: &ReferenceRecord) -> StoreResult<ReferenceId> {
        let subject = record.subject().trim();
        if subject.is_empty() {
            return Err(StoreError::Validation(format!("{} entry needs a name", record.kind())));
        }

        let kind = record.kind();
        let (first, second) = reference_columns(kind);
        let sql = format!(
            "INSERT INTO {} ({}, {}, created_at) VALUES (?1, ?2, ?3)",
            kind.table(),
            first,
            second
        );

        let conn = self.conn.lock();
        let now = Utc::now();
        match record {
            ReferenceRecord::Weather { forecast: detail, .. }
            | ReferenceRecord::CropCare { technique: detail, .. }
            | ReferenceRecord::Scheme { details: detail, .. } => {
                conn.execute(&sql, params![subject, detail.trim(), now])?;
            }
            ReferenceRecord::Price { price, .. } => {
                conn.execute(&sql, params![subject, price, now])?;
            }
        }
        let id = conn.last_insert_rowid();

        info!(reference_id = id, kind = %kind, "reference record added");
        Ok(id)
    }

    fn recent_references(&self, kind: ReferenceKind, limit: usize) -> StoreResult<Vec<ReferenceEntry>> {
        let (first, second) = reference_columns(kind);
        let sql = format!(
            "SELECT id, {}, {}, created_at FROM {} ORDER BY created_at DESC, id DESC LIMIT ?1",
            first,
            second,
            kind.table()
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![limit], |row| reference_from_row(kind, row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
