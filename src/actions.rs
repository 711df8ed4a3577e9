mod bigmarker;

use std::sync::Arc;

use crate::domain::{FormSettings, RelayOutcome, Submission, UserContext};

pub use bigmarker::BigMarkerAction;

/// A submitted form together with the settings of the form it came from.
#[derive(Debug)]
pub struct FormRecord {
    pub fields: Submission,
    pub form_settings: FormSettings,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Text,
}

/// A setting a form builder should offer when the action is enabled.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SettingsControl {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: ControlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub description: &'static str,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SettingsSection {
    pub id: &'static str,
    pub label: &'static str,
    pub controls: Vec<SettingsControl>,
}

/// A post-submission handler a host can invoke by name.
#[async_trait::async_trait]
pub trait FormAction: Send + Sync {
    fn name(&self) -> &'static str;

    fn label(&self) -> &'static str;

    async fn run(&self, record: &FormRecord, user: &UserContext) -> RelayOutcome;

    fn settings_section(&self) -> SettingsSection;

    /// Strips settings that must not leave the host when a form is exported.
    fn on_export(&self, element: serde_json::Value) -> serde_json::Value;
}

#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn FormAction>>,
}

impl ActionRegistry {
    /// Registers `action`, replacing any action already registered under its name.
    pub fn register<A: FormAction + 'static>(&mut self, action: A) -> &mut Self {
        self.actions.retain(|existing| existing.name() != action.name());
        self.actions.push(Arc::new(action));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FormAction>> {
        self.actions
            .iter()
            .find(|action| action.name() == name)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FormAction>> {
        self.actions.iter()
    }
}
