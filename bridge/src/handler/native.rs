//! Bank coins of the resource denom, attached to the deposit and released
//! with `BankMsg::Send`.

use bridge_common::executor::ExecutorMsg;
use bridge_common::AssetInfo;
use cosmwasm_std::{coins, BankMsg, CosmosMsg, SubMsg, Uint128, Uint256};

use super::{non_zero, release_response, DepositOutcome, ExecutionOutcome, HandlerContext};
use crate::codec::{decode_address, decode_message, TransferPayload};
use crate::decimals::{from_canonical, to_canonical_deposit, to_token_amount};
use crate::error::ContractError;

/// The coins themselves are checked against the attached funds by the
/// deposit entry point.
pub(super) fn deposit(ctx: HandlerContext, payload: &[u8]) -> Result<DepositOutcome, ContractError> {
    let mut transfer = TransferPayload::decode(payload)?;
    non_zero(to_token_amount(transfer.amount)?)?;
    let canonical = to_canonical_deposit(transfer.amount, ctx.properties.decimals)?;

    transfer.amount = canonical;
    Ok(DepositOutcome {
        payload: transfer.encode(),
        response: canonical.to_be_bytes().to_vec(),
        messages: vec![],
    })
}

pub(super) fn execute(ctx: HandlerContext, payload: &[u8]) -> Result<ExecutionOutcome, ContractError> {
    let transfer = TransferPayload::decode(payload)?;
    let amount = to_token_amount(from_canonical(transfer.amount, ctx.properties.decimals)?)?;
    let recipient = decode_address(ctx.deps.api, &transfer.recipient)?;
    let funds = if amount.is_zero() {
        vec![]
    } else {
        coins(amount.u128(), ctx.token)
    };

    let messages = match transfer.message {
        Some(call) => {
            let handle = ExecutorMsg::HandleBridgeMessage {
                asset: AssetInfo::native(ctx.token),
                amount,
                message: decode_message(&call.message)?,
                gas_limit: call.gas,
            };
            vec![SubMsg::new(handle.into_cosmos_msg(&recipient, funds)?).with_gas_limit(call.gas)]
        }
        None if funds.is_empty() => vec![],
        None => vec![SubMsg::new(BankMsg::Send {
            to_address: recipient.clone(),
            amount: funds,
        })],
    };

    Ok(ExecutionOutcome {
        response: release_response(ctx.token, &recipient, Uint256::from(amount)),
        messages,
    })
}

pub(super) fn withdraw(
    ctx: HandlerContext,
    recipient: &str,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    Ok(vec![BankMsg::Send {
        to_address: recipient.to_string(),
        amount: coins(non_zero(amount)?.u128(), ctx.token),
    }
    .into()])
}
