use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::domain::UserId;

const API_KEY_HEADER: &str = "API-KEY";

pub struct BigMarkerClient {
    http_client: Client,
    base_url: Url,
}

#[derive(serde::Serialize)]
pub struct ChannelSubscriptionRequest<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(serde::Serialize)]
pub struct ConferenceRegistrationRequest<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_bmcr_source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_user_id: Option<UserId>,
}

#[derive(thiserror::Error, Debug)]
pub enum BigMarkerError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("{0}")]
    Remote(String),
    #[error("BigMarker responded with status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("BigMarker returned a malformed response")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("Cannot build a BigMarker endpoint from {0}")]
    InvalidBaseUrl(Url),
}

impl BigMarkerClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Adds a subscriber to `channel`, returning the subscriber id (`bmid`) if
    /// BigMarker sent one back.
    #[tracing::instrument(
        name = "Adding a subscriber to a BigMarker channel",
        skip(self, api_key, request)
    )]
    pub async fn add_subscriber(
        &self,
        api_key: &Secret<String>,
        channel: &str,
        request: &ChannelSubscriptionRequest<'_>,
    ) -> Result<Option<String>, BigMarkerError> {
        let url = self.endpoint(&["channels", channel, "add_subscriber"])?;
        let reply = self.put(url, api_key, request).await?;
        Ok(non_empty_text(&reply, "bmid"))
    }

    /// Registers an attendee for a conference, returning their personal
    /// conference url if BigMarker sent one back.
    #[tracing::instrument(
        name = "Registering an attendee for a BigMarker conference",
        skip(self, api_key, request),
        fields(conference_id = %request.id)
    )]
    pub async fn register_for_conference(
        &self,
        api_key: &Secret<String>,
        request: &ConferenceRegistrationRequest<'_>,
    ) -> Result<Option<String>, BigMarkerError> {
        let url = self.endpoint(&["conferences", "register"])?;
        let reply = self.put(url, api_key, request).await?;
        Ok(non_empty_text(&reply, "conference_url"))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BigMarkerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BigMarkerError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn put<T: serde::Serialize>(
        &self,
        url: Url,
        api_key: &Secret<String>,
        body: &T,
    ) -> Result<Value, BigMarkerError> {
        let response = self
            .http_client
            .put(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(BigMarkerError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(BigMarkerError::Transport)?;

        let reply = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(reply) => reply,
                Err(_) if !status.is_success() => {
                    return Err(BigMarkerError::UnexpectedStatus(status))
                }
                Err(e) => return Err(BigMarkerError::MalformedResponse(e)),
            }
        };

        if let Some(error) = non_empty_text(&reply, "error") {
            return Err(BigMarkerError::Remote(error));
        }
        if !status.is_success() {
            return Err(BigMarkerError::UnexpectedStatus(status));
        }
        Ok(reply)
    }
}

fn non_empty_text(reply: &Value, key: &str) -> Option<String> {
    let value = reply.get(key)?;
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        Value::Object(fields) if !fields.is_empty() => Some(value.to_string()),
        _ => None,
    }
}
