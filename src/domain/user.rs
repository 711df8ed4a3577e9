use std::fmt::Formatter;
use std::sync::Arc;

use crate::profile_store::ProfileStore;

/// Profile field holding the BigMarker subscriber id.
pub const SUBSCRIBER_ID_FIELD: &str = "bmid";
/// Profile field holding the last conference url a user registered for.
pub const CONFERENCE_URL_FIELD: &str = "bigmarker_conference_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Hosts report `0` for a visitor who is not logged in.
    pub fn parse(id: i64) -> Option<UserId> {
        if id > 0 {
            Some(Self(id))
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The user acting on a form submission, with access to their profile fields.
#[derive(Clone)]
pub struct UserContext {
    user_id: Option<UserId>,
    profiles: Arc<dyn ProfileStore>,
}

impl UserContext {
    pub fn new(user_id: Option<UserId>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { user_id, profiles }
    }

    pub fn anonymous(profiles: Arc<dyn ProfileStore>) -> Self {
        Self::new(None, profiles)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn id(&self) -> Option<UserId> {
        self.user_id
    }

    pub async fn get_field(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        match self.user_id {
            Some(user_id) => self.profiles.get_field(user_id, key).await,
            None => Ok(None),
        }
    }

    pub async fn set_field(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let user_id = self
            .user_id
            .ok_or_else(|| anyhow::anyhow!("Cannot update the profile of an anonymous user"))?;
        self.profiles.set_field(user_id, key, value).await
    }
}

impl std::fmt::Debug for UserContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
