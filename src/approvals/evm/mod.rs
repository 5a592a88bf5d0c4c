pub mod approvals_manager;
pub mod client;
pub mod constants;
pub mod contracts;
pub mod models;
pub mod transaction;
pub mod utils;

#[cfg(test)]
mod testing;
