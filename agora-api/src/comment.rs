use chrono::Utc;
use uuid::Uuid;

use crate::{Error, PostId, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author_id: UserId,
    pub post_id: PostId,

    /// None for a top-level comment. A set parent references a comment of
    /// the same post, created strictly before this one, so parent chains
    /// cannot cycle.
    pub parent_id: Option<CommentId>,

    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: Time,
}

impl Comment {
    pub fn now(
        author_id: UserId,
        post_id: PostId,
        parent_id: Option<CommentId>,
        content: String,
    ) -> Comment {
        Comment {
            id: CommentId(Uuid::new_v4()),
            content,
            author_id,
            post_id,
            parent_id,
            upvotes: 0,
            downvotes: 0,
            created_at: Utc::now(),
        }
    }

    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)
    }
}
