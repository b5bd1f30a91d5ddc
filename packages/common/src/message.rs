//! Generic message carried by a bridged deposit.
//!
//! A message is an ordered list of actions executed on the destination
//! domain by the message executor, followed by the return of every leftover
//! balance to `recipient`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

/// One sub-call of a generic message.
///
/// Address fields are bech32 strings; an empty string means "not set".
#[cw_serde]
pub struct Action {
    /// Native coins (executor's native denom) forwarded with the call
    pub native_value: Uint128,
    /// Contract or account called by this action
    pub call_to: String,
    /// Spender granted a scoped allowance of `token_send` for this call
    pub approve_to: String,
    /// CW20 token the action spends
    pub token_send: String,
    /// CW20 token the action is expected to produce
    pub token_receive: String,
    /// Raw execute message sent to `call_to`
    pub data: Binary,
}

impl Action {
    pub fn has_approval(&self) -> bool {
        !self.approve_to.is_empty() && !self.token_send.is_empty()
    }
}

/// A generic message: actions plus the account receiving leftover funds.
#[cw_serde]
pub struct Message {
    /// Opaque correlation id echoed in events (32 bytes)
    pub transaction_id: Binary,
    pub actions: Vec<Action>,
    pub recipient: String,
}
