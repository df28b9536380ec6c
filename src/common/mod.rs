pub mod collection;
pub mod errors;
pub mod fetch;
pub mod identity;
pub mod notifications;
pub mod state;
