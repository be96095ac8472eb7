//! The Q&A forum: questions, answers, points and the reference board.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::{ListingConfig, PointsConfig};
use crate::models::{
    Answer, AnswerId, ApiPost, NewPost, PointAward, PointTransaction, PostFilter, PostId,
    PostSummary, ReferenceEntry, ReferenceId, ReferenceKind, ReferenceRecord, UserProfile,
};
use crate::traits::ContentStore;
use crate::{StoreError, StoreResult};

pub const QUESTION_REASON: &str = "Posted question";
pub const ANSWER_REASON: &str = "Answered question";

/// A post with its answers.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostSummary,
    pub answers: Vec<Answer>,
}

/// A user's balance and ledger.
#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    pub points: i64,
    pub transactions: Vec<PointTransaction>,
}

/// The latest rows from each reference table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceBoard {
    pub weather: Vec<ReferenceEntry>,
    pub crop_care: Vec<ReferenceEntry>,
    pub prices: Vec<ReferenceEntry>,
    pub schemes: Vec<ReferenceEntry>,
}

/// Forum operations on top of a [`ContentStore`].
///
/// Anonymous callers may ask and answer but earn nothing. Editing and
/// deleting require a logged-in caller, and an authored post may only be
/// changed by its author.
pub struct ForumService {
    store: Arc<dyn ContentStore>,
    points: PointsConfig,
    listing: ListingConfig,
}

impl ForumService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            points: PointsConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    pub fn with_points(mut self, points: PointsConfig) -> Self {
        self.points = points;
        self
    }

    pub fn with_listing(mut self, listing: ListingConfig) -> Self {
        self.listing = listing;
        self
    }

    /// Post a question. Logged-in authors earn the question award.
    pub fn ask(&self, user: Option<&UserProfile>, post: &NewPost) -> StoreResult<PostId> {
        let award = PointAward::new(self.points.question, QUESTION_REASON);
        let author = user.map(|u| u.id);
        self.store
            .create_post(author, post, author.map(|_| &award))
    }

    /// Answer a question. Logged-in authors earn the answer award.
    pub fn answer(&self, user: Option<&UserProfile>, post_id: PostId, content: &str) -> StoreResult<AnswerId> {
        let award = PointAward::new(self.points.answer, ANSWER_REASON);
        let author = user.map(|u| u.id);
        self.store
            .create_answer(post_id, author, content, author.map(|_| &award))
    }

    /// The latest posts for the front page.
    pub fn home(&self) -> StoreResult<Vec<PostSummary>> {
        self.store
            .list_posts(&PostFilter::default().limit(self.listing.home_limit))
    }

    /// Search posts by keyword and crop.
    pub fn browse(&self, filter: &PostFilter) -> StoreResult<Vec<PostSummary>> {
        self.store.list_posts(filter)
    }

    pub fn detail(&self, post_id: PostId) -> StoreResult<PostDetail> {
        let post = self.require_post(post_id)?;
        let answers = self.store.list_answers(post_id)?;
        Ok(PostDetail { post, answers })
    }

    pub fn edit(&self, user: Option<&UserProfile>, post_id: PostId, post: &NewPost) -> StoreResult<()> {
        self.authorize_change(user, post_id)?;
        self.store.update_post(post_id, post)
    }

    pub fn delete(&self, user: Option<&UserProfile>, post_id: PostId) -> StoreResult<()> {
        self.authorize_change(user, post_id)?;
        self.store.delete_post(post_id)
    }

    /// Balance and history for the logged-in user.
    pub fn points(&self, user: Option<&UserProfile>) -> StoreResult<PointsSummary> {
        let user = user.ok_or(StoreError::Unauthenticated)?;
        Ok(PointsSummary {
            points: self.store.point_balance(user.id)?,
            transactions: self.store.list_transactions(user.id)?,
        })
    }

    pub fn add_reference(&self, record: &ReferenceRecord) -> StoreResult<ReferenceId> {
        self.store.add_reference(record)
    }

    /// Latest rows of every reference table.
    pub fn reference_board(&self) -> StoreResult<ReferenceBoard> {
        let limit = self.listing.reference_limit;
        let mut board = ReferenceBoard::default();
        for kind in ReferenceKind::ALL {
            let rows = self.store.recent_references(kind, limit)?;
            match kind {
                ReferenceKind::Weather => board.weather = rows,
                ReferenceKind::CropCare => board.crop_care = rows,
                ReferenceKind::Price => board.prices = rows,
                ReferenceKind::Scheme => board.schemes = rows,
            }
        }
        Ok(board)
    }

    /// Every post in the JSON listing shape, newest first.
    pub fn api_posts(&self) -> StoreResult<Vec<ApiPost>> {
        let posts = self.store.list_posts(&PostFilter::default())?;
        Ok(posts.iter().map(ApiPost::from).collect())
    }

    fn require_post(&self, post_id: PostId) -> StoreResult<PostSummary> {
        self.store
            .get_post(post_id)?
            .ok_or_else(|| StoreError::NotFound(format!("post {}", post_id)))
    }

    fn authorize_change(&self, user: Option<&UserProfile>, post_id: PostId) -> StoreResult<()> {
        let user = user.ok_or(StoreError::Unauthenticated)?;
        let post = self.require_post(post_id)?;

        match post.author_id {
            Some(author) if author != user.id => {
                info!(post_id, user_id = user.id, "refused change to another user's post");
                Err(StoreError::Forbidden("only the author can change this post".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::Password;
    use crate::store::SqliteStore;
    use crate::traits::IdentityProvider;

    struct Fixture {
        store: Arc<SqliteStore>,
        forum: ForumService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(SqliteStore::open_in_memory().unwrap());
            let forum = ForumService::new(store.clone());
            Self { store, forum }
        }

        fn user(&self, name: &str) -> UserProfile {
            self.store.register(name, &Password::new("pw"), "Assam").unwrap();
            let token = self.store.login(name, &Password::new("pw")).unwrap();
            self.store.resolve(&token).unwrap().unwrap()
        }
    }

    fn question() -> NewPost {
        NewPost::new("Yellow tips", "Rice", "Leaves turning yellow at the tips")
    }

    #[test]
    fn test_asking_awards_five_points() {
        let fx = Fixture::new();
        let asha = fx.user("asha");

        fx.forum.ask(Some(&asha), &question()).unwrap();
        let summary = fx.forum.points(Some(&asha)).unwrap();

        assert_eq!(summary.points, 5);
        assert_eq!(summary.transactions.len(), 1);
        assert_eq!(summary.transactions[0].reason, QUESTION_REASON);
    }

    #[test]
    fn test_answering_awards_three_points() {
        let fx = Fixture::new();
        let asha = fx.user("asha");
        let ravi = fx.user("ravi");

        let post = fx.forum.ask(Some(&asha), &question()).unwrap();
        fx.forum.answer(Some(&ravi), post, "Check nitrogen").unwrap();

        let summary = fx.forum.points(Some(&ravi)).unwrap();
        assert_eq!(summary.points, 3);
        assert_eq!(summary.transactions[0].reason, ANSWER_REASON);
    }

    #[test]
    fn test_anonymous_participation_earns_nothing() {
        let fx = Fixture::new();
        let post = fx.forum.ask(None, &question()).unwrap();
        fx.forum.answer(None, post, "Try zinc").unwrap();

        let detail = fx.forum.detail(post).unwrap();
        assert_eq!(detail.post.author, None);
        assert_eq!(detail.answers.len(), 1);
        assert!(matches!(fx.forum.points(None), Err(StoreError::Unauthenticated)));
    }

    #[test]
    fn test_custom_point_values() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let forum = ForumService::new(store.clone()).with_points(PointsConfig {
            question: 10,
            answer: 1,
        });
        let id = store.register("meena", &Password::new("pw"), "").unwrap();
        let token = store.login("meena", &Password::new("pw")).unwrap();
        let meena = store.resolve(&token).unwrap().unwrap();
        assert_eq!(meena.id, id);

        let post = forum.ask(Some(&meena), &question()).unwrap();
        forum.answer(Some(&meena), post, "Self answer").unwrap();
        assert_eq!(forum.points(Some(&meena)).unwrap().points, 11);
    }

    #[test]
    fn test_only_author_may_edit_or_delete() {
        let fx = Fixture::new();
        let asha = fx.user("asha");
        let ravi = fx.user("ravi");
        let post = fx.forum.ask(Some(&asha), &question()).unwrap();

        let edit = NewPost::new("Yellow tips (solved)", "Rice", "It was zinc");
        assert!(matches!(fx.forum.edit(Some(&ravi), post, &edit), Err(StoreError::Forbidden(_))));
        assert!(matches!(fx.forum.delete(None, post), Err(StoreError::Unauthenticated)));

        fx.forum.edit(Some(&asha), post, &edit).unwrap();
        assert_eq!(fx.forum.detail(post).unwrap().post.title, "Yellow tips (solved)");

        fx.forum.delete(Some(&asha), post).unwrap();
        assert!(matches!(fx.forum.detail(post), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_anonymous_post_editable_by_any_user() {
        let fx = Fixture::new();
        let ravi = fx.user("ravi");
        let post = fx.forum.ask(None, &question()).unwrap();

        fx.forum
            .edit(Some(&ravi), post, &NewPost::new("Edited", "Rice", "Body"))
            .unwrap();
    }

    #[test]
    fn test_home_is_limited() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let forum = ForumService::new(store).with_listing(ListingConfig {
            home_limit: 2,
            reference_limit: 5,
        });
        for i in 0..3 {
            forum.ask(None, &NewPost::new(format!("Q{}", i), "", "body")).unwrap();
        }

        let home = forum.home().unwrap();
        assert_eq!(home.len(), 2);
        assert_eq!(home[0].title, "Q2");
        assert_eq!(forum.api_posts().unwrap().len(), 3);
    }

    #[test]
    fn test_reference_board() {
        let fx = Fixture::new();
        fx.forum
            .add_reference(&ReferenceRecord::Scheme {
                scheme_name: "PM-KISAN".into(),
                details: "Income support".into(),
            })
            .unwrap();
        fx.forum
            .add_reference(&ReferenceRecord::CropCare {
                crop_name: "Cotton".into(),
                technique: "Pheromone traps".into(),
            })
            .unwrap();

        let board = fx.forum.reference_board().unwrap();
        assert_eq!(board.schemes.len(), 1);
        assert_eq!(board.crop_care.len(), 1);
        assert!(board.weather.is_empty());
        assert!(board.prices.is_empty());
    }

    #[test]
    fn test_api_posts_shape() {
        let fx = Fixture::new();
        fx.forum.ask(None, &question()).unwrap();

        let json = serde_json::to_value(fx.forum.api_posts().unwrap()).unwrap();
        let first = &json[0];
        assert_eq!(first["title"], "Yellow tips");
        assert_eq!(first["crop"], "Rice");
        assert!(first.get("id").is_some());
        assert!(first.get("created_at").is_some());
        assert!(first.get("author").is_none());
    }
}
