use serde_json::Value;

use crate::actions::{ControlKind, FormAction, FormRecord, SettingsControl, SettingsSection};
use crate::bigmarker_client::BigMarkerClient;
use crate::domain::{ActionConfig, RelayOutcome, UserContext, API_KEY_SETTING, CHANNEL_SETTING};
use crate::relay;

/// Subscribes submitters to a BigMarker channel and registers them for webinars.
pub struct BigMarkerAction {
    client: BigMarkerClient,
}

impl BigMarkerAction {
    pub fn new(client: BigMarkerClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl FormAction for BigMarkerAction {
    fn name(&self) -> &'static str {
        "bigmarker"
    }

    fn label(&self) -> &'static str {
        "BigMarker"
    }

    async fn run(&self, record: &FormRecord, user: &UserContext) -> RelayOutcome {
        let config = ActionConfig::from_form_settings(&record.form_settings);
        relay::process(&self.client, &record.fields, &config, user).await
    }

    fn settings_section(&self) -> SettingsSection {
        SettingsSection {
            id: "section_bigmarker",
            label: "BigMarker",
            controls: vec![
                SettingsControl {
                    name: API_KEY_SETTING,
                    label: "BigMarker API Key",
                    kind: ControlKind::Text,
                    placeholder: Some("XXXXXXXXXXXX"),
                    description: "Enter your API Key",
                },
                SettingsControl {
                    name: CHANNEL_SETTING,
                    label: "BigMarker Channel Name",
                    kind: ControlKind::Text,
                    placeholder: None,
                    description: "the channel name you want to subscribe a user to.",
                },
            ],
        }
    }

    fn on_export(&self, mut element: Value) -> Value {
        strip_settings(&mut element);
        if let Some(settings) = element.get_mut("settings") {
            strip_settings(settings);
        }
        element
    }
}

fn strip_settings(value: &mut Value) {
    if let Value::Object(fields) = value {
        fields.remove(API_KEY_SETTING);
        fields.remove(CHANNEL_SETTING);
    }
}
