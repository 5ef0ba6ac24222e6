use uuid::Uuid;

use crate::{Error, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: Time,
}

impl Profile {
    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_name(&self.username)?;
        if let Some(url) = &self.avatar_url {
            crate::validate_string(url)?;
        }
        if let Some(bio) = &self.bio {
            crate::validate_string(bio)?;
        }
        Ok(())
    }
}
