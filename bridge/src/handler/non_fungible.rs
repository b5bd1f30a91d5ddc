//! cw721-shaped tokens: one token id per deposit, no decimal conversion.
//! The deposit response carries the token's metadata URI so the destination
//! can mint a faithful copy.

use bridge_common::nft::{NftExecuteMsg, NftInfoResponse, NftQueryMsg, OwnerOfResponse};
use cosmwasm_std::{wasm_execute, Addr, CosmosMsg, SubMsg};

use super::{release_response, DepositOutcome, ExecutionOutcome, HandlerContext};
use crate::codec::{decode_address, utf8, NftPayload};
use crate::error::ContractError;

pub(super) fn deposit(
    ctx: HandlerContext,
    depositor: &Addr,
    payload: &[u8],
) -> Result<DepositOutcome, ContractError> {
    let nft = NftPayload::decode(payload)?;
    let token_id = nft.token_id.to_string();

    let owner: OwnerOfResponse = ctx.deps.querier.query_wasm_smart(
        ctx.token,
        &NftQueryMsg::OwnerOf {
            token_id: token_id.clone(),
        },
    )?;
    if owner.owner != depositor.as_str() {
        return Err(ContractError::NotTokenOwner {
            depositor: depositor.to_string(),
            token_id,
        });
    }

    // Tokens without metadata bridge with an empty URI
    let metadata = ctx
        .deps
        .querier
        .query_wasm_smart::<NftInfoResponse>(
            ctx.token,
            &NftQueryMsg::NftInfo {
                token_id: token_id.clone(),
            },
        )
        .ok()
        .and_then(|info| info.token_uri)
        .unwrap_or_default();

    let msg = if ctx.properties.is_burnable {
        NftExecuteMsg::Burn { token_id }
    } else {
        NftExecuteMsg::TransferNft {
            recipient: ctx.env.contract.address.to_string(),
            token_id,
        }
    };

    let normalized = NftPayload {
        metadata: metadata.clone().into_bytes(),
        ..nft
    };
    Ok(DepositOutcome {
        payload: normalized.encode(),
        response: metadata.into_bytes(),
        messages: vec![wasm_execute(ctx.token, &msg, vec![])?.into()],
    })
}

pub(super) fn execute(ctx: HandlerContext, payload: &[u8]) -> Result<ExecutionOutcome, ContractError> {
    let nft = NftPayload::decode(payload)?;
    let recipient = decode_address(ctx.deps.api, &nft.recipient)?;
    let token_id = nft.token_id.to_string();

    let msg = if ctx.properties.is_burnable {
        let token_uri = if nft.metadata.is_empty() {
            None
        } else {
            Some(utf8(nft.metadata, "metadata")?)
        };
        NftExecuteMsg::Mint {
            token_id,
            owner: recipient.clone(),
            token_uri,
        }
    } else {
        NftExecuteMsg::TransferNft {
            recipient: recipient.clone(),
            token_id,
        }
    };

    Ok(ExecutionOutcome {
        response: release_response(ctx.token, &recipient, nft.token_id),
        messages: vec![SubMsg::new(wasm_execute(ctx.token, &msg, vec![])?)],
    })
}

pub(super) fn withdraw(
    ctx: HandlerContext,
    recipient: &str,
    token_id: String,
) -> Result<Vec<CosmosMsg>, ContractError> {
    let msg = NftExecuteMsg::TransferNft {
        recipient: recipient.to_string(),
        token_id,
    };
    Ok(vec![wasm_execute(ctx.token, &msg, vec![])?.into()])
}
