use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use agora_client::api::{
    ChangeEvent, ChatMessage, Comment, CommentId, Community, CommunityId, Error,
    IdentityProvider, Post, PostId, PostScope, Profile, Store, Subscription, SubscriptionId,
    UserId, VoteKind, VoteTarget, Watch,
};

/// In-memory stand-in for the hosted record store: same contract, same
/// derived-counter maintenance the hosted database does with triggers
/// (comment counts, vote counters, member counts), plus failure
/// injection for exercising error paths.
pub struct MockStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    profiles: BTreeMap<UserId, Profile>,
    communities: BTreeMap<CommunityId, Community>,
    members: HashSet<(CommunityId, UserId)>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    messages: Vec<ChatMessage>,
    votes: HashMap<(VoteTarget, UserId), VoteKind>,
    feeds: HashMap<SubscriptionId, Feed>,
    current_user: Option<UserId>,
    fail_next: Option<Error>,
}

struct Feed {
    watch: Watch,
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

impl MockStore {
    pub fn new() -> MockStore {
        MockStore {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock store poisoned")
    }

    /// Make the next store operation fail with `err`
    pub fn fail_next_with(&self, err: Error) {
        self.lock().fail_next = Some(err);
    }

    /// Set who `current_user` reports; None logs out
    pub fn login_as(&self, user: Option<UserId>) {
        self.lock().current_user = user;
    }

    /// Current durable state of a post, counters included
    pub fn test_post(&self, id: PostId) -> Option<Post> {
        self.lock().posts.get(&id).cloned()
    }

    /// Current durable state of a comment, counters included
    pub fn test_comment(&self, id: CommentId) -> Option<Comment> {
        self.lock().comments.get(&id).cloned()
    }

    pub fn test_vote(&self, target: VoteTarget, user: UserId) -> Option<VoteKind> {
        self.lock().votes.get(&(target, user)).copied()
    }

    pub fn test_num_feeds(&self) -> usize {
        self.lock().feeds.len()
    }

    /// Drop every live subscription, as a store losing its realtime
    /// connection would
    pub fn test_drop_feeds(&self) {
        self.lock().feeds.clear();
    }

    fn take_failure(inner: &mut Inner) -> Result<(), Error> {
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn relay(inner: &mut Inner, event: ChangeEvent) {
        let watch = match &event {
            ChangeEvent::CommentInserted(_) => Watch::Comments,
            ChangeEvent::MessageInserted(_) => Watch::Messages,
        };
        inner
            .feeds
            .retain(|_, f| f.watch != watch || f.sender.send(event.clone()).is_ok());
    }

    fn vote_counters(
        inner: &mut Inner,
        target: VoteTarget,
    ) -> Result<(&mut i64, &mut i64), Error> {
        match target {
            VoteTarget::Post(id) => inner
                .posts
                .get_mut(&id)
                .map(|p| (&mut p.upvotes, &mut p.downvotes))
                .ok_or_else(|| Error::NotFound(format!("post {id:?}"))),
            VoteTarget::Comment(id) => inner
                .comments
                .get_mut(&id)
                .map(|c| (&mut c.upvotes, &mut c.downvotes))
                .ok_or_else(|| Error::NotFound(format!("comment {id:?}"))),
        }
    }
}

impl Default for MockStore {
    fn default() -> MockStore {
        MockStore::new()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn fetch_post(&self, post: PostId) -> Result<Post, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        inner
            .posts
            .get(&post)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("post {post:?}")))
    }

    async fn list_posts(&self, scope: PostScope) -> Result<Vec<Post>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let mut posts: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| match scope {
                PostScope::FrontPage => true,
                PostScope::Community(c) => p.community_id == c,
                PostScope::Author(a) => p.author_id == a,
            })
            .cloned()
            .collect();
        posts.sort_unstable_by_key(|p| (Reverse(p.created_at), p.id));
        Ok(posts)
    }

    async fn list_comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.post_id == post)
            .cloned()
            .collect();
        comments.sort_unstable_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn list_comments_by(&self, author: UserId) -> Result<Vec<Comment>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.author_id == author)
            .cloned()
            .collect();
        comments.sort_unstable_by_key(|c| (Reverse(c.created_at), c.id));
        Ok(comments)
    }

    async fn list_messages(&self) -> Result<Vec<ChatMessage>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let mut messages = inner.messages.clone();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    async fn list_communities(&self, limit: Option<usize>) -> Result<Vec<Community>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let mut communities: Vec<Community> = inner.communities.values().cloned().collect();
        communities.sort_unstable_by_key(|c| (Reverse(c.member_count), c.id));
        if let Some(limit) = limit {
            communities.truncate(limit);
        }
        Ok(communities)
    }

    async fn fetch_community(&self, name: &str) -> Result<Community, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        inner
            .communities
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("community {name:?}")))
    }

    async fn fetch_profile(&self, username: &str) -> Result<Profile, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        inner
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("profile {username:?}")))
    }

    async fn insert_profile(&self, profile: Profile) -> Result<(), Error> {
        profile.validate()?;
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.profiles.contains_key(&profile.id) {
            return Err(Error::UuidAlreadyUsed(profile.id.0));
        }
        if inner.profiles.values().any(|p| p.username == profile.username) {
            return Err(Error::NameAlreadyUsed(profile.username));
        }
        inner.profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn insert_community(&self, community: Community) -> Result<(), Error> {
        community.validate()?;
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.communities.contains_key(&community.id) {
            return Err(Error::UuidAlreadyUsed(community.id.0));
        }
        if inner.communities.values().any(|c| c.name == community.name) {
            return Err(Error::NameAlreadyUsed(community.name));
        }
        inner.communities.insert(community.id, community);
        Ok(())
    }

    async fn insert_post(&self, post: Post) -> Result<(), Error> {
        post.validate()?;
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.posts.contains_key(&post.id) {
            return Err(Error::UuidAlreadyUsed(post.id.0));
        }
        if !inner.communities.contains_key(&post.community_id) {
            return Err(Error::NotFound(format!("community {:?}", post.community_id)));
        }
        inner.posts.insert(post.id, post);
        Ok(())
    }

    async fn insert_comment(&self, comment: Comment) -> Result<(), Error> {
        comment.validate()?;
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.comments.contains_key(&comment.id) {
            return Err(Error::UuidAlreadyUsed(comment.id.0));
        }
        let Some(post) = inner.posts.get_mut(&comment.post_id) else {
            return Err(Error::NotFound(format!("post {:?}", comment.post_id)));
        };
        post.comment_count += 1;
        inner.comments.insert(comment.id, comment.clone());
        Self::relay(&mut inner, ChangeEvent::CommentInserted(comment));
        Ok(())
    }

    async fn insert_message(&self, message: ChatMessage) -> Result<(), Error> {
        message.validate()?;
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.messages.iter().any(|m| m.id == message.id) {
            return Err(Error::UuidAlreadyUsed(message.id.0));
        }
        inner.messages.push(message.clone());
        Self::relay(&mut inner, ChangeEvent::MessageInserted(message));
        Ok(())
    }

    async fn join_community(&self, community: CommunityId, user: UserId) -> Result<(), Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if !inner.communities.contains_key(&community) {
            return Err(Error::NotFound(format!("community {community:?}")));
        }
        if inner.members.insert((community, user)) {
            inner
                .communities
                .get_mut(&community)
                .expect("community vanished under lock")
                .member_count += 1;
        }
        Ok(())
    }

    async fn leave_community(&self, community: CommunityId, user: UserId) -> Result<(), Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if !inner.communities.contains_key(&community) {
            return Err(Error::NotFound(format!("community {community:?}")));
        }
        if inner.members.remove(&(community, user)) {
            inner
                .communities
                .get_mut(&community)
                .expect("community vanished under lock")
                .member_count -= 1;
        }
        Ok(())
    }

    async fn set_vote(
        &self,
        target: VoteTarget,
        user: UserId,
        kind: VoteKind,
    ) -> Result<(), Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        // target must exist before any vote row is recorded for it
        Self::vote_counters(&mut inner, target)?;
        let prev = inner.votes.insert((target, user), kind);
        if prev == Some(kind) {
            return Ok(());
        }
        let (upvotes, downvotes) = Self::vote_counters(&mut inner, target)?;
        match prev {
            Some(VoteKind::Up) => *upvotes -= 1,
            Some(VoteKind::Down) => *downvotes -= 1,
            None => (),
        }
        match kind {
            VoteKind::Up => *upvotes += 1,
            VoteKind::Down => *downvotes += 1,
        }
        Ok(())
    }

    async fn clear_vote(&self, target: VoteTarget, user: UserId) -> Result<(), Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if let Some(prev) = inner.votes.remove(&(target, user)) {
            let (upvotes, downvotes) = Self::vote_counters(&mut inner, target)?;
            match prev {
                VoteKind::Up => *upvotes -= 1,
                VoteKind::Down => *downvotes -= 1,
            }
        }
        Ok(())
    }

    async fn subscribe(&self, watch: Watch) -> Result<Subscription, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        let id = SubscriptionId(Uuid::new_v4());
        let (sender, events) = mpsc::unbounded_channel();
        inner.feeds.insert(id, Feed { watch, sender });
        Ok(Subscription { id, events })
    }

    async fn unsubscribe(&self, sub: SubscriptionId) -> Result<(), Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        if inner.feeds.remove(&sub).is_none() {
            tracing::debug!(?sub, "unsubscribe for unknown subscription");
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MockStore {
    async fn current_user(&self) -> Result<Option<UserId>, Error> {
        let mut inner = self.lock();
        Self::take_failure(&mut inner)?;
        Ok(inner.current_user)
    }
}
