use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a message left on a post, optionally replying to another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub post_slug: String,
    pub parent_comment: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Materialize a new comment with a fresh ID and timestamps.
    ///
    /// Only stores call this; everyone else goes through [`NewComment`].
    pub fn new(input: NewComment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: input.content,
            author: input.author,
            post_slug: input.post_slug,
            parent_comment: input.parent_comment,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author == user_id
    }

    pub fn matches(&self, filter: &CommentFilter) -> bool {
        filter.id.is_none_or(|id| self.id == id)
            && filter
                .post_slug
                .as_deref()
                .is_none_or(|slug| self.post_slug == slug)
            && filter.author.is_none_or(|author| self.author == author)
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for creating a comment. The author always comes from the caller's identity.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_slug: String,
    pub author: Uuid,
    pub parent_comment: Option<Uuid>,
}

/// Partial update. Post slug and author are immutable and have no field here.
#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

/// Conjunctive filter over comments. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub id: Option<Uuid>,
    pub post_slug: Option<String>,
    pub author: Option<Uuid>,
}

impl CommentFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_post_slug(post_slug: impl Into<String>) -> Self {
        Self {
            post_slug: Some(post_slug.into()),
            ..Self::default()
        }
    }
}
