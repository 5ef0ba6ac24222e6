mod chat;
mod feed;
pub mod fetch;
mod thread;
mod tree;
mod vote;

pub use chat::{ChatView, ReloadTicket};
pub use feed::{run_event_feed, FeedUpdate};
pub use thread::{RefreshTicket, ThreadView};
pub use tree::{build_tree, CommentNode};
pub use vote::{VoteSnapshot, VoteState};

pub mod api {
    pub use agora_api::*;
}

pub mod prelude {
    pub use crate::api::{IdentityProvider, Store};
}
