pub use actions::{error_chain_fmt, export_action, list_actions, run_action};
pub use health_check::health_check;
pub use profile::user_profile;

mod actions;
mod health_check;
mod profile;
