pub mod editor;
pub mod models;
pub mod services;
