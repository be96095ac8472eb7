//! Collaborator traits.
//!
//! Services receive these as `Arc<dyn ...>` rather than reaching for an
//! ambient "current user" or global connection. `SqliteStore` implements all
//! three; tests substitute their own.

use cropwise_core::{AdviceRequest, AdviceResult};

use crate::models::{
    AdviceLogEntry, Answer, AnswerId, LogEntryId, NewPost, PointAward, PointTransaction, PostFilter,
    PostId, PostSummary, ReferenceEntry, ReferenceId, ReferenceKind, ReferenceRecord,
    SessionToken, TransactionId, UserId, UserProfile,
};
use crate::password::Password;
use crate::StoreResult;

/// Resolves sessions to users and manages credentials.
pub trait IdentityProvider: Send + Sync {
    /// Look up the user behind a session token.
    ///
    /// Unknown, expired or revoked tokens resolve to `None` (anonymous).
    fn resolve(&self, token: &SessionToken) -> StoreResult<Option<UserProfile>>;

    /// Create an account. Usernames are unique.
    fn register(&self, username: &str, password: &Password, region: &str) -> StoreResult<UserId>;

    /// Check credentials and open a session.
    fn login(&self, username: &str, password: &Password) -> StoreResult<SessionToken>;

    /// Revoke a session. Unknown tokens are ignored.
    fn logout(&self, token: &SessionToken) -> StoreResult<()>;
}

/// CRUD over posts, answers, points and reference tables.
pub trait ContentStore: Send + Sync {
    /// Insert a post. When `award` is given the author's balance and ledger
    /// are updated in the same transaction.
    fn create_post(
        &self,
        author: Option<UserId>,
        post: &NewPost,
        award: Option<&PointAward>,
    ) -> StoreResult<PostId>;

    /// Posts matching the filter, newest first.
    fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<PostSummary>>;

    fn get_post(&self, id: PostId) -> StoreResult<Option<PostSummary>>;

    /// Replace title, crop and content. Missing posts are `NotFound`.
    fn update_post(&self, id: PostId, post: &NewPost) -> StoreResult<()>;

    /// Delete a post together with its answers.
    fn delete_post(&self, id: PostId) -> StoreResult<()>;

    /// Insert an answer, optionally awarding points in the same transaction.
    fn create_answer(
        &self,
        post_id: PostId,
        author: Option<UserId>,
        content: &str,
        award: Option<&PointAward>,
    ) -> StoreResult<AnswerId>;

    /// Answers to a post, oldest first.
    fn list_answers(&self, post_id: PostId) -> StoreResult<Vec<Answer>>;

    /// Increment a balance and record the transaction atomically.
    fn award_points(&self, user_id: UserId, award: &PointAward) -> StoreResult<TransactionId>;

    /// A user's transactions, newest first.
    fn list_transactions(&self, user_id: UserId) -> StoreResult<Vec<PointTransaction>>;

    fn point_balance(&self, user_id: UserId) -> StoreResult<i64>;

    fn add_reference(&self, record: &ReferenceRecord) -> StoreResult<ReferenceId>;

    /// Most recent reference rows of one kind, newest first.
    fn recent_references(&self, kind: ReferenceKind, limit: usize) -> StoreResult<Vec<ReferenceEntry>>;
}

/// Append-only audit log of advice requests.
pub trait AdviceLog: Send + Sync {
    fn record(
        &self,
        user_id: Option<UserId>,
        request: &AdviceRequest,
        result: &AdviceResult,
    ) -> StoreResult<LogEntryId>;

    /// Most recent entries, newest first.
    fn recent_entries(&self, limit: usize) -> StoreResult<Vec<AdviceLogEntry>>;
}
