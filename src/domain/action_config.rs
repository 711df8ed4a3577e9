use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};

pub const API_KEY_SETTING: &str = "bigmarker_api_key";
pub const CHANNEL_SETTING: &str = "bigmarker_channel";

/// Per-form action settings as stored by the form builder.
pub type FormSettings = Map<String, Value>;

/// BigMarker settings of a single form.
#[derive(Debug)]
pub struct ActionConfig {
    api_key: Option<Secret<String>>,
    channel: Option<String>,
}

impl ActionConfig {
    pub fn new(api_key: Secret<String>, channel: Option<String>) -> Self {
        let api_key = Some(api_key).filter(|key| !key.expose_secret().trim().is_empty());
        let channel = channel.filter(|channel| !channel.trim().is_empty());
        Self { api_key, channel }
    }

    pub fn from_form_settings(settings: &FormSettings) -> Self {
        let api_key = setting_text(settings, API_KEY_SETTING).unwrap_or_default();
        Self::new(Secret::new(api_key), setting_text(settings, CHANNEL_SETTING))
    }

    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.api_key.as_ref()
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }
}

fn setting_text(settings: &FormSettings, key: &str) -> Option<String> {
    match settings.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
