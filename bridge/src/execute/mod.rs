//! Execute handlers for the domain bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `deposit` - Deposit and Retry
//! - `proposal` - signed proposal batches and their per-proposal sub-messages
//! - `admin` - registry, fees, pause, key generation and access control

mod admin;
mod deposit;
mod proposal;

pub use admin::*;
pub use deposit::*;
pub use proposal::*;

use crate::error::ContractError;
use crate::state::Config;

/// Deposits and executions need a completed key generation and no pause
fn ensure_active(config: &Config) -> Result<(), ContractError> {
    if config.mpc_address.is_none() {
        return Err(ContractError::MpcAddressNotSet);
    }
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    Ok(())
}
