//! Users and sessions.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::{params, ErrorCode, OptionalExtension};
use tracing::info;

use super::SqliteStore;
use crate::models::{SessionToken, UserId, UserProfile};
use crate::password::{hash_password, verify_password, Password};
use crate::traits::IdentityProvider;
use crate::{StoreError, StoreResult};

lazy_static! {
    /// 3 to 32 characters: letters, digits, underscore, dot, hyphen.
    static ref USERNAME_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").unwrap();
}

/// Trim and validate a username.
pub(crate) fn normalize_username(raw: &str) -> StoreResult<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(StoreError::Validation("username is required".to_string()));
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(StoreError::Validation(
            "username must be 3-32 letters, digits, '_', '.' or '-'".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

impl IdentityProvider for SqliteStore {
    fn resolve(&self, token: &SessionToken) -> StoreResult<Option<UserProfile>> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.username, u.region, u.points
                FROM sessions s JOIN users u ON s.user_id = u.id
                WHERE s.token = ?1 AND s.expires_at > ?2
                "#,
                params![token.as_str(), Utc::now()],
                |row| {
                    Ok(UserProfile {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        region: row.get(2)?,
                        points: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn register(&self, username: &str, password: &Password, region: &str) -> StoreResult<UserId> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(StoreError::Validation("password is required".to_string()));
        }
        let hash = hash_password(password)?;

        let conn = self.conn.lock();
        match conn.execute(
            "INSERT INTO users (username, password_hash, region) VALUES (?1, ?2, ?3)",
            params![&username, &hash, region.trim()],
        ) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                info!(user_id = id, username = %username, "user registered");
                Ok(id)
            }
            Err(e) if is_constraint_violation(&e) => Err(StoreError::UsernameTaken(username)),
            Err(e) => Err(e.into()),
        }
    }

    fn login(&self, username: &str, password: &Password) -> StoreResult<SessionToken> {
        let ttl = chrono::Duration::from_std(self.session_ttl)
            .map_err(|_| StoreError::Validation("session ttl out of range".to_string()))?;

        let conn = self.conn.lock();
        let row: Option<(UserId, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?1",
                params![username.trim()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let user_id = match row {
            Some((id, hash)) if verify_password(password, &hash) => id,
            _ => return Err(StoreError::InvalidCredentials),
        };

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| StoreError::Validation("session ttl out of range".to_string()))?;

        conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;

        let token = SessionToken::generate();
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![token.as_str(), user_id, now, expires_at],
        )?;
        info!(user_id, "session opened");

        Ok(token)
    }

    fn logout(&self, token: &SessionToken) -> StoreResult<()> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token.as_str()])?;
        if removed > 0 {
            info!("session closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_register_login_resolve() {
        let store = store();
        let id = store
            .register("  asha ", &Password::new("paddy-field"), "Punjab")
            .unwrap();

        let token = store.login("asha", &Password::new("paddy-field")).unwrap();
        let user = store.resolve(&token).unwrap().unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.username, "asha");
        assert_eq!(user.region, "Punjab");
        assert_eq!(user.points, 0);
    }

    #[test]
    fn test_stored_hash_is_argon2() {
        let store = store();
        store.register("gopal", &Password::new("kharif"), "").unwrap();

        let stored: String = store
            .conn
            .lock()
            .query_row(
                "SELECT password_hash FROM users WHERE username = 'gopal'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("kharif"));
    }

    #[test]
    fn test_duplicate_username() {
        let store = store();
        store.register("ravi", &Password::new("a"), "").unwrap();
        let err = store.register("ravi", &Password::new("b"), "").unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(name) if name == "ravi"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let store = store();
        assert!(matches!(
            store.register("   ", &Password::new("x"), ""),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.register("meena", &Password::new(""), ""),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.register("has space", &Password::new("x"), ""),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_credentials_are_indistinguishable() {
        let store = store();
        store.register("kiran", &Password::new("right"), "").unwrap();

        let wrong_password = store.login("kiran", &Password::new("wrong")).unwrap_err();
        let unknown_user = store.login("nobody", &Password::new("right")).unwrap_err();

        assert!(matches!(wrong_password, StoreError::InvalidCredentials));
        assert!(matches!(unknown_user, StoreError::InvalidCredentials));
    }

    #[test]
    fn test_logout_revokes_session() {
        let store = store();
        store.register("devi", &Password::new("pw"), "").unwrap();
        let token = store.login("devi", &Password::new("pw")).unwrap();

        store.logout(&token).unwrap();
        assert!(store.resolve(&token).unwrap().is_none());

        // Second logout is a no-op
        store.logout(&token).unwrap();
    }

    #[test]
    fn test_expired_session_is_anonymous() {
        let store = store().with_session_ttl(Duration::from_millis(1));
        store.register("arun", &Password::new("pw"), "").unwrap();
        let token = store.login("arun", &Password::new("pw")).unwrap();

        std::thread::sleep(Duration::from_millis(20));
        assert!(store.resolve(&token).unwrap().is_none());
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let store = store();
        assert!(store
            .resolve(&SessionToken::new("not-a-token"))
            .unwrap()
            .is_none());
    }
}
