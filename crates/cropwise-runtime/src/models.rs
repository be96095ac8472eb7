//! Records exchanged with the collaborators.

use chrono::{DateTime, Utc};
use cropwise_core::AdviceRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = i64;
pub type PostId = i64;
pub type AnswerId = i64;
pub type TransactionId = i64;
pub type ReferenceId = i64;
pub type LogEntryId = i64;

/// Opaque session token handed out at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub region: String,
    pub points: i64,
}

/// Title, crop and body of a question, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub crop: String,
    pub content: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, crop: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            crop: crop.into(),
            content: content.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            crop: self.crop.trim().to_string(),
            content: self.content.trim().to_string(),
        }
    }
}

/// A post joined with its author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    pub author_id: Option<UserId>,
    pub author: Option<String>,
    pub title: String,
    pub crop: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Shape of a post in the JSON listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPost {
    pub id: PostId,
    pub title: String,
    pub crop: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&PostSummary> for ApiPost {
    fn from(post: &PostSummary) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            crop: post.crop.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
        }
    }
}

/// Optional keyword and crop filters for post listings.
///
/// The keyword matches title or content; the crop matches the crop tag.
/// Both are case-insensitive substring matches and are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub keyword: Option<String>,
    pub crop: Option<String>,
    pub limit: Option<usize>,
}

impl PostFilter {
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = non_blank(keyword.into());
        self
    }

    pub fn crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = non_blank(crop.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// An answer joined with its author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub post_id: PostId,
    pub author_id: Option<UserId>,
    pub author: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A change to a user's point balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAward {
    pub points: i64,
    pub reason: String,
}

impl PointAward {
    pub fn new(points: i64, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: reason.into(),
        }
    }
}

/// Ledger entry recorded alongside a balance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub points: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Kinds of admin-entered reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Weather,
    CropCare,
    Price,
    Scheme,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Weather,
        ReferenceKind::CropCare,
        ReferenceKind::Price,
        ReferenceKind::Scheme,
    ];

    pub(crate) fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Weather => "weather",
            ReferenceKind::CropCare => "crop_care",
            ReferenceKind::Price => "prices",
            ReferenceKind::Scheme => "schemes",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::Weather => "weather",
            ReferenceKind::CropCare => "crop care",
            ReferenceKind::Price => "prices",
            ReferenceKind::Scheme => "schemes",
        };
        f.write_str(label)
    }
}

/// One admin-entered reference row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceRecord {
    Weather { location: String, forecast: String },
    CropCare { crop_name: String, technique: String },
    Price { crop_name: String, price: f64 },
    Scheme { scheme_name: String, details: String },
}

impl ReferenceRecord {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ReferenceRecord::Weather { .. } => ReferenceKind::Weather,
            ReferenceRecord::CropCare { .. } => ReferenceKind::CropCare,
            ReferenceRecord::Price { .. } => ReferenceKind::Price,
            ReferenceRecord::Scheme { .. } => ReferenceKind::Scheme,
        }
    }

    /// The identifying text of the record (location, crop or scheme name).
    pub fn subject(&self) -> &str {
        match self {
            ReferenceRecord::Weather { location, .. } => location,
            ReferenceRecord::CropCare { crop_name, .. } => crop_name,
            ReferenceRecord::Price { crop_name, .. } => crop_name,
            ReferenceRecord::Scheme { scheme_name, .. } => scheme_name,
        }
    }
}

/// A stored reference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: ReferenceId,
    #[serde(flatten)]
    pub record: ReferenceRecord,
    pub created_at: DateTime<Utc>,
}

/// An audit row pairing an advice request with its computed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceLogEntry {
    pub id: LogEntryId,
    pub user_id: Option<UserId>,
    pub request: AdviceRequest,
    pub advice_text: String,
    pub created_at: DateTime<Utc>,
}
