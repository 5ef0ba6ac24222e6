use crate::{
    api::{ChangeEvent, Comment, CommentId, Error, PostId, Store},
    build_tree, CommentNode,
};

/// One post's displayed comment forest, kept current by full rebuilds
/// (rebuild-merge): every accepted refresh re-derives the forest from a
/// complete read, so notifications arriving in any order converge to the
/// same display once their rebuilds complete.
#[derive(Debug)]
pub struct ThreadView {
    post_id: PostId,
    forest: Vec<CommentNode>,
    refresh_seq: u64,
}

/// Identifies one refresh round of one thread. A ticket taken before a
/// newer refresh began (or before the view navigated away) no longer
/// installs, so a slow response cannot overwrite a newer view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RefreshTicket {
    post_id: PostId,
    seq: u64,
}

impl ThreadView {
    pub fn new(post_id: PostId) -> ThreadView {
        ThreadView {
            post_id,
            forest: Vec::new(),
            refresh_seq: 0,
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn forest(&self) -> &[CommentNode] {
        &self.forest
    }

    /// Point the view at another post. The forest empties until the next
    /// refresh completes; refreshes still in flight become stale.
    pub fn navigate_to(&mut self, post_id: PostId) {
        if post_id != self.post_id {
            self.post_id = post_id;
            self.forest = Vec::new();
            self.refresh_seq += 1;
        }
    }

    /// True iff `event` warrants rebuilding this view
    pub fn handle_event(&self, event: &ChangeEvent) -> bool {
        matches!(event, ChangeEvent::CommentInserted(c) if c.post_id == self.post_id)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_seq += 1;
        RefreshTicket {
            post_id: self.post_id,
            seq: self.refresh_seq,
        }
    }

    /// Swap in the forest built from `comments`, atomically, unless the
    /// ticket went stale in the meantime. Returns whether it installed.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, comments: Vec<Comment>) -> bool {
        if ticket.post_id != self.post_id || ticket.seq != self.refresh_seq {
            tracing::info!(post = ?ticket.post_id, "dropping stale refresh response");
            return false;
        }
        self.forest = build_tree(comments);
        true
    }

    /// Fetch this post's comments and rebuild. On failure the forest on
    /// display stays exactly as it was.
    pub async fn refresh<S: Store>(&mut self, store: &S) -> Result<(), Error> {
        let ticket = self.begin_refresh();
        let comments = store.list_comments(self.post_id).await?;
        self.complete_refresh(ticket, comments);
        Ok(())
    }

    /// The displayed record for one comment, e.g. to adjust its vote
    /// counters optimistically
    pub fn comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        CommentNode::find_in(&mut self.forest, &id).map(|n| &mut n.comment)
    }
}
