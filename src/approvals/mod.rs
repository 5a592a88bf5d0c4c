pub mod errors;
pub mod evm;
pub mod models;
mod serde_primitives;
