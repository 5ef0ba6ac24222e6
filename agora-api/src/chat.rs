use chrono::Utc;
use uuid::Uuid;

use crate::{Error, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn stub() -> MessageId {
        MessageId(STUB_UUID)
    }
}

/// One line of the live chat. The chat page has no account system: the
/// username is whatever was typed on the join screen.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub username: String,
    pub content: String,
    pub created_at: Time,
}

impl ChatMessage {
    pub fn now(username: String, content: String) -> ChatMessage {
        ChatMessage {
            id: MessageId(Uuid::new_v4()),
            username,
            content,
            created_at: Utc::now(),
        }
    }

    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_name(&self.username)?;
        crate::validate_string(&self.content)
    }
}
