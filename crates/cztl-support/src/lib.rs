pub mod agent;
pub mod conversation;
pub mod errors;
pub mod escalation;
pub mod instructions;
pub mod models;
pub mod orchestrator;
pub mod prompt_template;
pub mod providers;
pub mod quick_actions;
