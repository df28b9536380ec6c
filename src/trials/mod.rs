pub mod attachments;
pub mod codes;
pub mod details;
pub mod models;
pub mod notes;
pub mod services;
pub mod setup_steps;
pub mod tasks;
pub mod team;
