//! Signed proposal execution.
//!
//! `ExecuteProposals` verifies the batch signature and skips proposals whose
//! nonce is already used. The structure of every remaining proposal is checked
//! up front; any problem there rejects the whole batch. Each of them then runs
//! as its own `ProcessProposal` sub-message dispatched with `reply_on_error`:
//! if the handler fails, the
//! sub-message's state changes (the nonce mark included) are rolled back and
//! `reply` reports the failure while the remaining proposals carry on.

use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, Event, MessageInfo, Reply, Response, SubMsg,
    SubMsgResult, WasmMsg,
};

use super::ensure_active;
use crate::error::ContractError;
use crate::handler::{self, HandlerContext};
use crate::hash::{keccak256, to_hex};
use crate::msg::{ExecuteMsg, Proposal};
use crate::nonce::{is_used, mark_used};
use crate::resource::{load_resource, parse_resource_id};
use crate::signature::verify_proposals;
use crate::state::{PendingProposal, CONFIG, PENDING_PROPOSALS};

pub fn execute_proposals(
    deps: DepsMut,
    env: Env,
    proposals: Vec<Proposal>,
    signature: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_active(&config)?;
    let mpc_address = config
        .mpc_address
        .as_ref()
        .ok_or(ContractError::MpcAddressNotSet)?;

    if proposals.is_empty() {
        return Err(ContractError::EmptyProposalsArray);
    }

    verify_proposals(
        deps.api,
        config.chain_id,
        env.contract.address.as_str(),
        mpc_address,
        &proposals,
        &signature,
    )?;

    let mut submessages = Vec::with_capacity(proposals.len());
    let mut skipped = 0u32;

    for (index, proposal) in proposals.into_iter().enumerate() {
        // Replays are dropped without an event, even if their route changed since
        if is_used(deps.storage, proposal.origin_domain_id, proposal.deposit_nonce)? {
            skipped += 1;
            continue;
        }

        let resource_id = parse_resource_id(&proposal.resource_id)?;
        let (record, _) = load_resource(deps.storage, &resource_id)?;
        handler::validate_payload(record.handler, &proposal.data)?;

        let reply_id = index as u64;
        PENDING_PROPOSALS.save(
            deps.storage,
            reply_id,
            &PendingProposal {
                origin_domain_id: proposal.origin_domain_id,
                deposit_nonce: proposal.deposit_nonce,
            },
        )?;
        let process = WasmMsg::Execute {
            contract_addr: env.contract.address.to_string(),
            msg: to_json_binary(&ExecuteMsg::ProcessProposal { proposal, reply_id })?,
            funds: vec![],
        };
        submessages.push(SubMsg::reply_on_error(process, reply_id));
    }

    Ok(Response::new()
        .add_attribute("method", "execute_proposals")
        .add_attribute("dispatched", submessages.len().to_string())
        .add_attribute("skipped", skipped.to_string())
        .add_submessages(submessages))
}

/// Mark the nonce and run the handler; only the bridge may call this
pub fn execute_process_proposal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    proposal: Proposal,
    reply_id: u64,
) -> Result<Response, ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::OnlyBridge);
    }
    // The outcome is known to be success once this call returns Ok
    PENDING_PROPOSALS.remove(deps.storage, reply_id);

    // An earlier copy in the same batch already went through
    if is_used(deps.storage, proposal.origin_domain_id, proposal.deposit_nonce)? {
        return Ok(Response::new()
            .add_attribute("method", "process_proposal")
            .add_attribute("skipped", "true"));
    }
    mark_used(deps.storage, proposal.origin_domain_id, proposal.deposit_nonce)?;

    let config = CONFIG.load(deps.storage)?;
    let resource_id = parse_resource_id(&proposal.resource_id)?;
    let (record, properties) = load_resource(deps.storage, &resource_id)?;
    let ctx = HandlerContext {
        deps: deps.as_ref(),
        env: &env,
        config: &config,
        token: &record.token,
        properties: &properties,
    };
    let outcome = handler::execute(ctx, record.handler, &proposal.data)?;

    let event = Event::new("proposal_execution")
        .add_attribute("origin_domain_id", proposal.origin_domain_id.to_string())
        .add_attribute("deposit_nonce", proposal.deposit_nonce.to_string())
        .add_attribute("data_hash", to_hex(&keccak256(&proposal.data)))
        .add_attribute("handler_response", to_hex(&outcome.response));

    Ok(Response::new()
        .add_submessages(outcome.messages)
        .add_event(event)
        .add_attribute("method", "process_proposal")
        .add_attribute("handler", record.handler.as_str()))
}

/// Report a proposal whose sub-message failed
pub fn reply_process_proposal(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let pending = PENDING_PROPOSALS
        .may_load(deps.storage, msg.id)?
        .ok_or(ContractError::UnknownReplyId { id: msg.id })?;
    PENDING_PROPOSALS.remove(deps.storage, msg.id);

    let error = match msg.result {
        SubMsgResult::Err(error) => error,
        SubMsgResult::Ok(_) => return Ok(Response::new()),
    };

    Ok(Response::new()
        .add_event(
            Event::new("failed_handler_execution")
                .add_attribute("origin_domain_id", pending.origin_domain_id.to_string())
                .add_attribute("deposit_nonce", pending.deposit_nonce.to_string())
                .add_attribute("lowlevel_data", error),
        )
        .add_attribute("method", "reply_process_proposal"))
}
