mod chat;
mod comment;
mod community;
mod error;
mod post;
mod store;
mod user;
mod vote;

pub use chat::{ChatMessage, MessageId};
pub use comment::{Comment, CommentId};
pub use community::{Community, CommunityId};
pub use error::Error;
pub use post::{Post, PostBody, PostId, PostScope};
pub use store::{
    ChangeEvent, IdentityProvider, Store, Subscription, SubscriptionId, Watch,
};
pub use user::{Profile, UserId};
pub use vote::{VoteKind, VoteTarget};

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<chrono::Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Record text lands in TEXT columns, which cannot hold NUL bytes; reject
/// them before the store round-trip rather than after.
pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(s.to_string()));
    }
    Ok(())
}

/// Usernames and community url-names end up in urls (`/user/<name>`,
/// `/r/<name>`); only ascii alphanumerics, `_` and `-` are allowed.
pub fn validate_name(s: &str) -> Result<(), Error> {
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidName(s.to_string()));
    }
    Ok(())
}
