mod actions;
mod run_action;
