use std::fmt::Formatter;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::actions::{ActionRegistry, FormAction, FormRecord, SettingsSection};
use crate::domain::{FormSettings, Submission, UserContext, UserId};
use crate::profile_store::ProfileStore;

#[derive(serde::Deserialize)]
pub struct RunActionBody {
    fields: Submission,
    #[serde(default)]
    form_settings: FormSettings,
    #[serde(default)]
    user: Option<ActingUser>,
}

#[derive(serde::Deserialize)]
pub struct ActingUser {
    id: i64,
}

#[derive(serde::Serialize)]
struct ActionDescription {
    name: &'static str,
    label: &'static str,
    settings: SettingsSection,
}

#[derive(thiserror::Error)]
pub enum ActionError {
    #[error("No form action is registered as {0:?}")]
    UnknownAction(String),
    #[error("The request body is not valid for this action")]
    InvalidBody(#[source] serde_json::Error),
}

impl std::fmt::Debug for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::UnknownAction(_) => StatusCode::NOT_FOUND,
            ActionError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

fn lookup(registry: &ActionRegistry, name: String) -> Result<Arc<dyn FormAction>, ActionError> {
    registry.get(&name).ok_or(ActionError::UnknownAction(name))
}

// Bodies are parsed after the lookup: an unknown action is a 404 whatever it was sent.
fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ActionError> {
    serde_json::from_slice(body).map_err(ActionError::InvalidBody)
}

pub async fn list_actions(registry: web::Data<ActionRegistry>) -> HttpResponse {
    let actions: Vec<_> = registry
        .iter()
        .map(|action| ActionDescription {
            name: action.name(),
            label: action.label(),
            settings: action.settings_section(),
        })
        .collect();
    HttpResponse::Ok().json(actions)
}

/// Runs a form action for a submitted form. Relay failures are reported in
/// the body; the submission itself always succeeds.
#[tracing::instrument(
    name = "Running a form action",
    skip(name, body, registry, profiles),
    fields(action = tracing::field::Empty, user_id = tracing::field::Empty)
)]
pub async fn run_action(
    name: web::Path<String>,
    body: web::Bytes,
    registry: web::Data<ActionRegistry>,
    profiles: web::Data<dyn ProfileStore>,
) -> Result<HttpResponse, ActionError> {
    let name = name.into_inner();
    tracing::Span::current().record("action", &tracing::field::display(&name));
    let action = lookup(&registry, name)?;

    let RunActionBody {
        fields,
        form_settings,
        user,
    } = parse_body(&body)?;
    let user_id = user.and_then(|user| UserId::parse(user.id));
    if let Some(user_id) = user_id {
        tracing::Span::current().record("user_id", &tracing::field::display(user_id));
    }
    let user = UserContext::new(user_id, profiles.into_inner());
    let record = FormRecord {
        fields,
        form_settings,
    };

    let outcome = action.run(&record, &user).await;
    tracing::info!(
        targets = outcome.results.len(),
        failures = outcome.errors().count(),
        "Form action finished"
    );
    Ok(HttpResponse::Ok().json(outcome))
}

#[tracing::instrument(name = "Exporting a form element", skip(name, element, registry))]
pub async fn export_action(
    name: web::Path<String>,
    element: web::Bytes,
    registry: web::Data<ActionRegistry>,
) -> Result<HttpResponse, ActionError> {
    let action = lookup(&registry, name.into_inner())?;
    let element: serde_json::Value = parse_body(&element)?;
    Ok(HttpResponse::Ok().json(action.on_export(element)))
}
