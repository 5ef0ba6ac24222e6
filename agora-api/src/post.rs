use chrono::Utc;
use uuid::Uuid;

use crate::{CommunityId, Error, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn stub() -> PostId {
        PostId(STUB_UUID)
    }
}

/// The three post flavors; a post stores exactly one body.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum PostBody {
    Text(String),
    Image { url: String },
    Link { url: String },
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author_id: UserId,
    pub community_id: CommunityId,
    pub body: PostBody,

    /// Vote counters are maintained by the store; clients only adjust
    /// their displayed copies optimistically
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,

    pub created_at: Time,
}

impl Post {
    pub fn now(
        author_id: UserId,
        community_id: CommunityId,
        title: String,
        body: PostBody,
    ) -> Post {
        Post {
            id: PostId(Uuid::new_v4()),
            title,
            author_id,
            community_id,
            body,
            upvotes: 0,
            downvotes: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.title)?;
        match &self.body {
            PostBody::Text(text) => crate::validate_string(text),
            PostBody::Image { url } | PostBody::Link { url } => crate::validate_string(url),
        }
    }
}

/// Which post listing to fetch; every listing is newest-first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PostScope {
    FrontPage,
    Community(CommunityId),
    Author(UserId),
}
