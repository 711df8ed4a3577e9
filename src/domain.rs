mod action_config;
mod outcome;
mod submission;
mod user;

pub use action_config::{ActionConfig, FormSettings, API_KEY_SETTING, CHANNEL_SETTING};
pub use outcome::{Delivery, RelayOutcome, Target, TargetResult};
pub use submission::{Identity, RequiredField, Submission};
pub use user::{UserContext, UserId, CONFERENCE_URL_FIELD, SUBSCRIBER_ID_FIELD};
