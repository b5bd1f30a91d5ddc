//! Message Executor Contract
//!
//! Runs the actions of a bridged generic message under a per-action gas
//! stipend. Each action is its own sub-message: a failing action is rolled
//! back and reported while the rest carry on, and whatever the message still
//! owns at the end is handed to its recipient.

pub mod contract;
pub mod error;
mod execution;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
