use std::fmt::Formatter;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::{UserContext, UserId, CONFERENCE_URL_FIELD, SUBSCRIBER_ID_FIELD};
use crate::profile_store::ProfileStore;
use crate::routes::error_chain_fmt;

#[derive(serde::Serialize)]
struct BigMarkerProfile {
    user_id: UserId,
    bmid: Option<String>,
    bigmarker_conference_url: Option<String>,
}

#[derive(thiserror::Error)]
pub enum ProfileError {
    #[error("{0} is not a valid user id")]
    InvalidUser(i64),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::InvalidUser(_) => StatusCode::NOT_FOUND,
            ProfileError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(name = "Reading the BigMarker profile of a user", skip(profiles))]
pub async fn user_profile(
    user_id: web::Path<i64>,
    profiles: web::Data<dyn ProfileStore>,
) -> Result<HttpResponse, ProfileError> {
    let user_id = user_id.into_inner();
    let user_id = UserId::parse(user_id).ok_or(ProfileError::InvalidUser(user_id))?;
    let user = UserContext::new(Some(user_id), profiles.into_inner());

    let profile = BigMarkerProfile {
        user_id,
        bmid: user.get_field(SUBSCRIBER_ID_FIELD).await?,
        bigmarker_conference_url: user.get_field(CONFERENCE_URL_FIELD).await?,
    };
    Ok(HttpResponse::Ok().json(profile))
}
