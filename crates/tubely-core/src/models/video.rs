use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical video record, owned by the external record store.
///
/// The ingestion pipeline only reads it and proposes an updated copy; it never
/// creates or deletes records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn new(id: Uuid, owner_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title: title.into(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `owner_id` may modify this record.
    pub fn is_owned_by(&self, owner_id: Uuid) -> bool {
        self.owner_id == owner_id
    }

    /// Copy of this record with `video_url` set. Timestamps are left to the
    /// store that persists it.
    #[must_use]
    pub fn with_video_url(&self, url: impl Into<String>) -> Self {
        Self {
            video_url: Some(url.into()),
            ..self.clone()
        }
    }
}
