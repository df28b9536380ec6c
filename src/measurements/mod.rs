pub mod ledger;
pub mod models;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
