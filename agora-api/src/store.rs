use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    ChatMessage, Comment, Community, CommunityId, Error, Post, PostId, PostScope, Profile, UserId,
    VoteKind, VoteTarget, STUB_UUID,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn stub() -> SubscriptionId {
        SubscriptionId(STUB_UUID)
    }
}

/// A notification that a watched collection changed.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ChangeEvent {
    CommentInserted(Comment),
    MessageInserted(ChatMessage),
}

/// Which collection a subscription watches for inserts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Watch {
    Comments,
    Messages,
}

/// A live change feed. `events` stays open until the store drops the
/// subscription or `unsubscribe` is called; dropping the receiver also
/// ends it.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: mpsc::UnboundedReceiver<ChangeEvent>,
}

/// The hosted record store, seen through the operations this application
/// actually issues. Implementations own transport, auth and persistence;
/// every failure surfaces as an [`Error`] and must leave previously
/// returned data untouched.
#[async_trait]
pub trait Store {
    async fn fetch_post(&self, post: PostId) -> Result<Post, Error>;

    /// Posts of the given listing, newest first
    async fn list_posts(&self, scope: PostScope) -> Result<Vec<Post>, Error>;

    /// All comments of one post, by creation time ascending — the input
    /// order the comment tree builder requires
    async fn list_comments(&self, post: PostId) -> Result<Vec<Comment>, Error>;

    /// One author's comments across all posts, newest first
    async fn list_comments_by(&self, author: UserId) -> Result<Vec<Comment>, Error>;

    /// All chat messages, oldest first
    async fn list_messages(&self) -> Result<Vec<ChatMessage>, Error>;

    /// Communities by member count descending, optionally truncated
    async fn list_communities(&self, limit: Option<usize>) -> Result<Vec<Community>, Error>;

    async fn fetch_community(&self, name: &str) -> Result<Community, Error>;
    async fn fetch_profile(&self, username: &str) -> Result<Profile, Error>;

    async fn insert_profile(&self, profile: Profile) -> Result<(), Error>;
    async fn insert_community(&self, community: Community) -> Result<(), Error>;
    async fn insert_post(&self, post: Post) -> Result<(), Error>;
    async fn insert_comment(&self, comment: Comment) -> Result<(), Error>;
    async fn insert_message(&self, message: ChatMessage) -> Result<(), Error>;

    async fn join_community(&self, community: CommunityId, user: UserId) -> Result<(), Error>;
    async fn leave_community(&self, community: CommunityId, user: UserId) -> Result<(), Error>;

    /// Upsert `user`'s vote on `target`; the store adjusts the target's
    /// counters by the same delta the client applied optimistically
    async fn set_vote(
        &self,
        target: VoteTarget,
        user: UserId,
        kind: VoteKind,
    ) -> Result<(), Error>;

    /// Remove `user`'s vote on `target` if any; idempotent
    async fn clear_vote(&self, target: VoteTarget, user: UserId) -> Result<(), Error>;

    async fn subscribe(&self, watch: Watch) -> Result<Subscription, Error>;

    /// Idempotent: unknown or already-removed handles succeed
    async fn unsubscribe(&self, sub: SubscriptionId) -> Result<(), Error>;
}

#[async_trait]
pub trait IdentityProvider {
    /// The logged-in user, or None when browsing anonymously
    async fn current_user(&self) -> Result<Option<UserId>, Error>;
}
