//! Capability lookup for administrative functions
//!
//! Each access-controlled function is keyed by its snake_case name and held
//! by exactly one account. Instantiation hands all of them to the admin.

use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::ACCESS_CONTROL;

pub const ADMIN_SET_RESOURCE: &str = "admin_set_resource";
pub const ADMIN_SET_BURNABLE: &str = "admin_set_burnable";
pub const ADMIN_SET_DEPOSIT_NONCE: &str = "admin_set_deposit_nonce";
pub const ADMIN_PAUSE_TRANSFERS: &str = "admin_pause_transfers";
pub const ADMIN_UNPAUSE_TRANSFERS: &str = "admin_unpause_transfers";
pub const ADMIN_WITHDRAW: &str = "admin_withdraw";
pub const ADMIN_SET_FEE: &str = "admin_set_fee";
pub const ADMIN_SET_FEE_RECIPIENT: &str = "admin_set_fee_recipient";
pub const START_KEYGEN: &str = "start_keygen";
pub const END_KEYGEN: &str = "end_keygen";
pub const REFRESH_KEY: &str = "refresh_key";
pub const GRANT_ACCESS: &str = "grant_access";

pub const ACCESS_CONTROLLED_FUNCTIONS: &[&str] = &[
    ADMIN_SET_RESOURCE,
    ADMIN_SET_BURNABLE,
    ADMIN_SET_DEPOSIT_NONCE,
    ADMIN_PAUSE_TRANSFERS,
    ADMIN_UNPAUSE_TRANSFERS,
    ADMIN_WITHDRAW,
    ADMIN_SET_FEE,
    ADMIN_SET_FEE_RECIPIENT,
    START_KEYGEN,
    END_KEYGEN,
    REFRESH_KEY,
    GRANT_ACCESS,
];

/// Fails with `AccessNotAllowed` unless `sender` holds `function`
pub fn ensure_access(
    storage: &dyn Storage,
    sender: &Addr,
    function: &str,
) -> Result<(), ContractError> {
    match ACCESS_CONTROL.may_load(storage, function)? {
        Some(holder) if holder == *sender => Ok(()),
        _ => Err(ContractError::AccessNotAllowed {
            sender: sender.to_string(),
            function: function.to_string(),
        }),
    }
}

pub fn grant(storage: &mut dyn Storage, function: &str, account: &Addr) -> Result<(), ContractError> {
    if !ACCESS_CONTROLLED_FUNCTIONS.contains(&function) {
        return Err(ContractError::UnknownFunction {
            function: function.to_string(),
        });
    }
    ACCESS_CONTROL.save(storage, function, account)?;
    Ok(())
}
