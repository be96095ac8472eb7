//! # cropwise-runtime
//!
//! Collaborators and services around the advice evaluator.
//!
//! The evaluator in `cropwise-core` is pure. Everything with side effects
//! lives here, behind three traits:
//!
//! - [`IdentityProvider`]: sessions, registration, login
//! - [`ContentStore`]: posts, answers, point ledger, reference tables
//! - [`AdviceLog`]: append-only audit of advice requests
//!
//! [`SqliteStore`] implements all three over one local database.
//! [`AdviceService`] and [`ForumService`] take the collaborators they need
//! as explicit `Arc<dyn ...>` arguments.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cropwise_core::{AdviceForm, MissingFieldPolicy};
//! use cropwise_runtime::{AdviceService, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::open("cropwise.db")?);
//! let service = AdviceService::new(store, MissingFieldPolicy::Lenient);
//!
//! let form = AdviceForm::new().crop("Rice").temp("38").hum("85").ph("5.2").price("90");
//! let outcome = service.advise(None, &form)?;
//! for message in outcome.result.messages() {
//!     println!("{}", message);
//! }
//! ```

pub mod config;
pub mod models;
pub mod password;
pub mod services;
pub mod store;
pub mod traits;

pub use config::{ConfigError, CropwiseConfig, ListingConfig, PointsConfig};
pub use models::{
    AdviceLogEntry, Answer, AnswerId, ApiPost, LogEntryId, NewPost, PointAward, PointTransaction,
    PostFilter, PostId, PostSummary, ReferenceEntry, ReferenceId, ReferenceKind, ReferenceRecord,
    SessionToken, TransactionId, UserId, UserProfile,
};
pub use password::Password;
pub use services::{AdviceOutcome, AdviceService, ForumService, PointsSummary, PostDetail, ReferenceBoard};
pub use store::SqliteStore;
pub use traits::{AdviceLog, ContentStore, IdentityProvider};

use thiserror::Error;

/// Errors from collaborators and services.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Please log in first")]
    Unauthenticated,

    #[error("Not allowed: {0}")]
    Forbidden(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
