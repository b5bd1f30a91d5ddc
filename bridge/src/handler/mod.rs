//! Asset handlers
//!
//! Every resource id routes to one handler variant. A handler has two sides:
//!
//! - `deposit` validates the depositor's payload, builds the messages that
//!   lock or burn the asset, and returns the payload relayers carry to the
//!   destination (amounts normalized to canonical precision).
//! - `execute` decodes a proposal payload and builds the messages that
//!   release or mint the asset on this domain.
//!
//! Handlers never touch the nonce bitmap; the proposal executor owns replay
//! protection and failure isolation.

mod fungible;
mod generic;
mod multi_token;
mod native;
mod non_fungible;

use cosmwasm_std::{Addr, CosmosMsg, Deps, Env, SubMsg, Uint128, Uint256};

use crate::abi::{self, AbiValue};
use crate::codec::{GenericPayload, MultiTokenPayload, NftPayload, TransferPayload};
use crate::decimals::to_token_amount;
use crate::error::ContractError;
use crate::state::{Config, HandlerKind, TokenProperties};

/// Everything a handler may read while building its messages
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub deps: Deps<'a>,
    pub env: &'a Env,
    pub config: &'a Config,
    pub token: &'a str,
    pub properties: &'a TokenProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositOutcome {
    /// Payload relayed to the destination domain
    pub payload: Vec<u8>,
    pub response: Vec<u8>,
    pub messages: Vec<CosmosMsg>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub response: Vec<u8>,
    pub messages: Vec<SubMsg>,
}

pub fn deposit(
    ctx: HandlerContext,
    handler: HandlerKind,
    depositor: &Addr,
    payload: &[u8],
) -> Result<DepositOutcome, ContractError> {
    match handler {
        HandlerKind::Fungible => fungible::deposit(ctx, depositor, payload),
        HandlerKind::NonFungible => non_fungible::deposit(ctx, depositor, payload),
        HandlerKind::MultiToken => multi_token::deposit(ctx, depositor, payload),
        HandlerKind::Generic => generic::deposit(ctx, depositor, payload),
        HandlerKind::Native => native::deposit(ctx, payload),
    }
}

pub fn execute(
    ctx: HandlerContext,
    handler: HandlerKind,
    payload: &[u8],
) -> Result<ExecutionOutcome, ContractError> {
    match handler {
        HandlerKind::Fungible => fungible::execute(ctx, payload),
        HandlerKind::NonFungible => non_fungible::execute(ctx, payload),
        HandlerKind::MultiToken => multi_token::execute(ctx, payload),
        HandlerKind::Generic => generic::execute(ctx, payload),
        HandlerKind::Native => native::execute(ctx, payload),
    }
}

/// Structural check of a proposal payload, run before any handler executes
pub fn validate_payload(handler: HandlerKind, payload: &[u8]) -> Result<(), ContractError> {
    match handler {
        HandlerKind::Fungible | HandlerKind::Native => TransferPayload::decode(payload).map(|_| ()),
        HandlerKind::NonFungible => NftPayload::decode(payload).map(|_| ()),
        HandlerKind::MultiToken => MultiTokenPayload::decode(payload).map(|_| ()),
        HandlerKind::Generic => GenericPayload::decode(payload).map(|_| ()),
    }
}

/// Amount in token units moved by a deposit, for resources that have one
pub fn deposit_amount(
    handler: HandlerKind,
    payload: &[u8],
) -> Result<Option<Uint128>, ContractError> {
    match handler {
        HandlerKind::Fungible | HandlerKind::Native => {
            let transfer = TransferPayload::decode(payload)?;
            Ok(Some(to_token_amount(transfer.amount)?))
        }
        _ => Ok(None),
    }
}

/// Messages moving bridge-held assets of a resource to `recipient`
pub fn withdraw(
    ctx: HandlerContext,
    handler: HandlerKind,
    recipient: &str,
    amount: Uint128,
    token_id: Option<String>,
) -> Result<Vec<CosmosMsg>, ContractError> {
    match handler {
        HandlerKind::Fungible => fungible::withdraw(ctx, recipient, amount),
        HandlerKind::Native => native::withdraw(ctx, recipient, amount),
        HandlerKind::NonFungible => non_fungible::withdraw(ctx, recipient, required(token_id)?),
        HandlerKind::MultiToken => {
            multi_token::withdraw(ctx, recipient, required(token_id)?, amount)
        }
        HandlerKind::Generic => Err(ContractError::InvalidWithdrawal {
            reason: "generic resources hold no assets".to_string(),
        }),
    }
}

fn required(token_id: Option<String>) -> Result<String, ContractError> {
    token_id.ok_or_else(|| ContractError::InvalidWithdrawal {
        reason: "token_id is required for this resource".to_string(),
    })
}

fn non_zero(amount: Uint128) -> Result<Uint128, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    Ok(amount)
}

/// `abi.encode(bytes token, bytes recipient, uint256 amount)`
fn release_response(token: &str, recipient: &str, amount: Uint256) -> Vec<u8> {
    abi::encode(&[
        AbiValue::Bytes(token.as_bytes().to_vec()),
        AbiValue::Bytes(recipient.as_bytes().to_vec()),
        AbiValue::Uint(amount),
    ])
}
