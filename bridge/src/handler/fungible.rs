//! cw20 tokens: lock with `TransferFrom` or burn with `BurnFrom` on deposit,
//! release with `Transfer` or `Mint` on execution.

use bridge_common::executor::ExecutorMsg;
use bridge_common::AssetInfo;
use cosmwasm_std::{wasm_execute, Addr, CosmosMsg, SubMsg, Uint128, Uint256};
use cw20::Cw20ExecuteMsg;

use super::{non_zero, release_response, DepositOutcome, ExecutionOutcome, HandlerContext};
use crate::codec::{decode_address, decode_message, TransferPayload};
use crate::decimals::{from_canonical, to_canonical_deposit, to_token_amount};
use crate::error::ContractError;

pub(super) fn deposit(
    ctx: HandlerContext,
    depositor: &Addr,
    payload: &[u8],
) -> Result<DepositOutcome, ContractError> {
    let mut transfer = TransferPayload::decode(payload)?;
    let amount = non_zero(to_token_amount(transfer.amount)?)?;
    let canonical = to_canonical_deposit(transfer.amount, ctx.properties.decimals)?;

    let msg = if ctx.properties.is_burnable {
        Cw20ExecuteMsg::BurnFrom {
            owner: depositor.to_string(),
            amount,
        }
    } else {
        Cw20ExecuteMsg::TransferFrom {
            owner: depositor.to_string(),
            recipient: ctx.env.contract.address.to_string(),
            amount,
        }
    };

    transfer.amount = canonical;
    Ok(DepositOutcome {
        payload: transfer.encode(),
        response: canonical.to_be_bytes().to_vec(),
        messages: vec![wasm_execute(ctx.token, &msg, vec![])?.into()],
    })
}

pub(super) fn execute(ctx: HandlerContext, payload: &[u8]) -> Result<ExecutionOutcome, ContractError> {
    let transfer = TransferPayload::decode(payload)?;
    let amount = to_token_amount(from_canonical(transfer.amount, ctx.properties.decimals)?)?;
    let recipient = decode_address(ctx.deps.api, &transfer.recipient)?;

    let mut messages = vec![];
    // Dust below the token's precision rounds to nothing
    if !amount.is_zero() {
        messages.push(SubMsg::new(wasm_execute(
            ctx.token,
            &release_msg(ctx, &recipient, amount),
            vec![],
        )?));
    }

    if let Some(call) = transfer.message {
        let handle = ExecutorMsg::HandleBridgeMessage {
            asset: AssetInfo::cw20(Addr::unchecked(ctx.token)),
            amount,
            message: decode_message(&call.message)?,
            gas_limit: call.gas,
        };
        messages.push(SubMsg::new(handle.into_cosmos_msg(&recipient, vec![])?).with_gas_limit(call.gas));
    }

    Ok(ExecutionOutcome {
        response: release_response(ctx.token, &recipient, Uint256::from(amount)),
        messages,
    })
}

fn release_msg(ctx: HandlerContext, recipient: &str, amount: Uint128) -> Cw20ExecuteMsg {
    if ctx.properties.is_burnable {
        Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        }
    } else {
        Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount,
        }
    }
}

pub(super) fn withdraw(
    ctx: HandlerContext,
    recipient: &str,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    let msg = Cw20ExecuteMsg::Transfer {
        recipient: recipient.to_string(),
        amount: non_zero(amount)?,
    };
    Ok(vec![wasm_execute(ctx.token, &msg, vec![])?.into()])
}
