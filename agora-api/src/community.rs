use uuid::Uuid;

use crate::{Error, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommunityId(pub Uuid);

impl CommunityId {
    pub fn stub() -> CommunityId {
        CommunityId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Community {
    pub id: CommunityId,

    /// Url-facing name, as in `r/<name>`; lowercase
    pub name: String,
    pub display_name: String,
    pub description: String,

    pub icon_url: Option<String>,
    pub banner_url: Option<String>,

    /// Maintained by the store on join/leave
    pub member_count: i64,

    pub creator_id: UserId,
    pub created_at: Time,
}

impl Community {
    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_name(&self.name)?;
        if self.name.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidName(self.name.clone()));
        }
        crate::validate_string(&self.display_name)?;
        crate::validate_string(&self.description)
    }
}
