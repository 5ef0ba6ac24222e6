use crate::{CommentId, PostId};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    pub fn opposite(self) -> VoteKind {
        match self {
            VoteKind::Up => VoteKind::Down,
            VoteKind::Down => VoteKind::Up,
        }
    }
}

/// What a vote applies to; one row per (target, user) in the store.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum VoteTarget {
    Post(PostId),
    Comment(CommentId),
}
