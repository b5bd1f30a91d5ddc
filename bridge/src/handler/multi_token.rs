//! cw1155-shaped tokens: a batch of (token id, amount) pairs per deposit.

use bridge_common::multi_token::{MultiTokenExecuteMsg, TokenId};
use cosmwasm_std::{wasm_execute, Addr, Binary, CosmosMsg, SubMsg, Uint128};

use super::{non_zero, DepositOutcome, ExecutionOutcome, HandlerContext};
use crate::abi::{self, AbiValue};
use crate::codec::{decode_address, MultiTokenPayload};
use crate::decimals::to_token_amount;
use crate::error::ContractError;

fn batch(payload: &MultiTokenPayload) -> Result<Vec<(TokenId, Uint128)>, ContractError> {
    payload
        .token_ids
        .iter()
        .zip(&payload.amounts)
        .map(|(id, amount)| Ok((id.to_string(), to_token_amount(*amount)?)))
        .collect()
}

pub(super) fn deposit(
    ctx: HandlerContext,
    depositor: &Addr,
    payload: &[u8],
) -> Result<DepositOutcome, ContractError> {
    let transfer = MultiTokenPayload::decode(payload)?;
    let batch = batch(&transfer)?;
    for (_, amount) in &batch {
        non_zero(*amount)?;
    }

    let msg = if ctx.properties.is_burnable {
        MultiTokenExecuteMsg::BatchBurn {
            from: depositor.to_string(),
            batch,
        }
    } else {
        MultiTokenExecuteMsg::BatchSendFrom {
            from: depositor.to_string(),
            to: ctx.env.contract.address.to_string(),
            batch,
            msg: None,
        }
    };

    Ok(DepositOutcome {
        payload: transfer.encode(),
        response: vec![],
        messages: vec![wasm_execute(ctx.token, &msg, vec![])?.into()],
    })
}

pub(super) fn execute(ctx: HandlerContext, payload: &[u8]) -> Result<ExecutionOutcome, ContractError> {
    let transfer = MultiTokenPayload::decode(payload)?;
    let recipient = decode_address(ctx.deps.api, &transfer.recipient)?;
    let batch = batch(&transfer)?;
    let data = if transfer.transfer_data.is_empty() {
        None
    } else {
        Some(Binary::from(transfer.transfer_data))
    };

    let msg = if ctx.properties.is_burnable {
        MultiTokenExecuteMsg::BatchMint {
            to: recipient.clone(),
            batch,
            msg: data,
        }
    } else {
        MultiTokenExecuteMsg::BatchSendFrom {
            from: ctx.env.contract.address.to_string(),
            to: recipient.clone(),
            batch,
            msg: data,
        }
    };

    Ok(ExecutionOutcome {
        response: abi::encode(&[
            AbiValue::Bytes(ctx.token.as_bytes().to_vec()),
            AbiValue::Bytes(recipient.into_bytes()),
        ]),
        messages: vec![SubMsg::new(wasm_execute(ctx.token, &msg, vec![])?)],
    })
}

pub(super) fn withdraw(
    ctx: HandlerContext,
    recipient: &str,
    token_id: TokenId,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    let msg = MultiTokenExecuteMsg::BatchSendFrom {
        from: ctx.env.contract.address.to_string(),
        to: recipient.to_string(),
        batch: vec![(token_id, non_zero(amount)?)],
        msg: None,
    };
    Ok(vec![wasm_execute(ctx.token, &msg, vec![])?.into()])
}
