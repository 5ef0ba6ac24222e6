use crate::api::{Comment, Error, Post, Store, UserId, VoteKind, VoteTarget};

/// Displayed vote counters of one post or comment, plus the current
/// user's own standing vote on it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VoteState {
    pub upvotes: i64,
    pub downvotes: i64,
    pub mine: Option<VoteKind>,
}

/// The counters as they were before an optimistic `cast`, for restoring
/// after the store refuses the write.
#[derive(Clone, Copy, Debug)]
pub struct VoteSnapshot(VoteState);

impl VoteState {
    pub fn new(upvotes: i64, downvotes: i64, mine: Option<VoteKind>) -> VoteState {
        VoteState {
            upvotes,
            downvotes,
            mine,
        }
    }

    pub fn of_post(post: &Post, mine: Option<VoteKind>) -> VoteState {
        VoteState::new(post.upvotes, post.downvotes, mine)
    }

    pub fn of_comment(comment: &Comment, mine: Option<VoteKind>) -> VoteState {
        VoteState::new(comment.upvotes, comment.downvotes, mine)
    }

    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    fn counter_mut(&mut self, kind: VoteKind) -> &mut i64 {
        match kind {
            VoteKind::Up => &mut self.upvotes,
            VoteKind::Down => &mut self.downvotes,
        }
    }

    /// One click on the `kind` button: cast a fresh vote, retract a
    /// standing vote of the same kind, or flip the opposite one. The
    /// adjustment equals the counter delta the store will durably apply
    /// for the corresponding write.
    pub fn cast(&mut self, kind: VoteKind) -> VoteSnapshot {
        let snapshot = VoteSnapshot(*self);
        match self.mine {
            Some(prev) if prev == kind => {
                *self.counter_mut(kind) -= 1;
                self.mine = None;
            }
            Some(prev) => {
                *self.counter_mut(prev) -= 1;
                *self.counter_mut(kind) += 1;
                self.mine = Some(kind);
            }
            None => {
                *self.counter_mut(kind) += 1;
                self.mine = Some(kind);
            }
        }
        snapshot
    }

    pub fn rollback(&mut self, snapshot: VoteSnapshot) {
        *self = snapshot.0;
    }

    /// Apply one click optimistically, then make it durable: upsert while
    /// a vote stands, delete after a retraction. A refused write rolls
    /// the counters back to their pre-click values.
    pub async fn submit<S: Store>(
        &mut self,
        store: &S,
        target: VoteTarget,
        user: UserId,
        kind: VoteKind,
    ) -> Result<(), Error> {
        let snapshot = self.cast(kind);
        let res = match self.mine {
            Some(kind) => store.set_vote(target, user, kind).await,
            None => store.clear_vote(target, user).await,
        };
        if let Err(err) = res {
            self.rollback(snapshot);
            return Err(err);
        }
        Ok(())
    }
}
