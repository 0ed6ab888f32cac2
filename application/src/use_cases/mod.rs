//! Use cases (application services)

pub mod classify_command;
pub mod code_generation_skill;
pub mod completion_agents;
pub mod process_command;
pub mod route_skill;
pub mod run_review_loop;
