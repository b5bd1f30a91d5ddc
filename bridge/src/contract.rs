//! Domain Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Deposit, proposal and admin handlers
//! - `handler/` - Per-asset lock/burn and release/mint logic
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::access::{grant, ACCESS_CONTROLLED_FUNCTIONS};
use crate::error::ContractError;
use crate::execute::{
    execute_deposit, execute_end_keygen, execute_grant_access, execute_pause,
    execute_process_proposal, execute_proposals, execute_refresh_key, execute_retry,
    execute_set_burnable, execute_set_deposit_nonce, execute_set_fee, execute_set_fee_recipient,
    execute_set_resource, execute_start_keygen, execute_unpause, execute_withdraw,
    reply_process_proposal,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_access_holder, query_calculate_fee, query_config, query_deposit_count,
    query_is_proposal_executed, query_proposals_digest, query_resource, query_resources,
    query_status, query_token_properties,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let fee_recipient = deps.api.addr_validate(&msg.fee_recipient)?;

    // Transfers stay blocked until key generation records the MPC address
    let config = Config {
        domain_id: msg.domain_id,
        chain_id: msg.chain_id,
        paused: false,
        mpc_address: None,
        fee_recipient,
        generic_gas_cap: msg.generic_gas_cap,
    };
    CONFIG.save(deps.storage, &config)?;

    for function in ACCESS_CONTROLLED_FUNCTIONS {
        grant(deps.storage, function, &admin)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("domain_id", msg.domain_id.to_string())
        .add_attribute("chain_id", msg.chain_id.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Deposits
        ExecuteMsg::Deposit {
            destination_domain_id,
            resource_id,
            deposit_data,
            fee_data,
        } => execute_deposit(
            deps,
            env,
            info,
            destination_domain_id,
            resource_id,
            deposit_data,
            fee_data,
        ),
        ExecuteMsg::Retry { deposit_tx_hash } => execute_retry(deposit_tx_hash),

        // Proposal execution
        ExecuteMsg::ExecuteProposal {
            proposal,
            signature,
        } => execute_proposals(deps, env, vec![proposal], signature),
        ExecuteMsg::ExecuteProposals {
            proposals,
            signature,
        } => execute_proposals(deps, env, proposals, signature),
        ExecuteMsg::ProcessProposal { proposal, reply_id } => {
            execute_process_proposal(deps, env, info, proposal, reply_id)
        }

        // Resource registry
        ExecuteMsg::AdminSetResource {
            resource_id,
            token,
            registration,
        } => execute_set_resource(deps, env, info, resource_id, token, registration),
        ExecuteMsg::AdminSetBurnable { token } => execute_set_burnable(deps, info, token),
        ExecuteMsg::AdminSetDepositNonce { domain_id, nonce } => {
            execute_set_deposit_nonce(deps, info, domain_id, nonce)
        }

        // Emergency controls
        ExecuteMsg::AdminPauseTransfers {} => execute_pause(deps, info),
        ExecuteMsg::AdminUnpauseTransfers {} => execute_unpause(deps, info),
        ExecuteMsg::AdminWithdraw {
            resource_id,
            recipient,
            amount,
            token_id,
        } => execute_withdraw(deps, env, info, resource_id, recipient, amount, token_id),

        // Fees
        ExecuteMsg::AdminSetFee {
            destination_domain_id,
            resource_id,
            strategy,
        } => execute_set_fee(deps, info, destination_domain_id, resource_id, strategy),
        ExecuteMsg::AdminSetFeeRecipient { fee_recipient } => {
            execute_set_fee_recipient(deps, info, fee_recipient)
        }

        // Key generation & access control
        ExecuteMsg::StartKeygen {} => execute_start_keygen(deps, info),
        ExecuteMsg::EndKeygen { mpc_address } => execute_end_keygen(deps, info, mpc_address),
        ExecuteMsg::RefreshKey { hash } => execute_refresh_key(deps, info, hash),
        ExecuteMsg::GrantAccess { function, account } => {
            execute_grant_access(deps, info, function, account)
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    reply_process_proposal(deps, msg)
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Status {} => to_json_binary(&query_status(deps)?),

        // Nonce queries
        QueryMsg::IsProposalExecuted {
            domain_id,
            deposit_nonce,
        } => to_json_binary(&query_is_proposal_executed(deps, domain_id, deposit_nonce)?),
        QueryMsg::DepositCount { domain_id } => {
            to_json_binary(&query_deposit_count(deps, domain_id)?)
        }

        // Registry queries
        QueryMsg::Resource { resource_id } => to_json_binary(&query_resource(deps, resource_id)?),
        QueryMsg::Resources { start_after, limit } => {
            to_json_binary(&query_resources(deps, start_after, limit)?)
        }
        QueryMsg::TokenProperties { token } => {
            to_json_binary(&query_token_properties(deps, token)?)
        }
        QueryMsg::AccessHolder { function } => {
            to_json_binary(&query_access_holder(deps, function)?)
        }

        // Fee & signature queries
        QueryMsg::CalculateFee {
            destination_domain_id,
            resource_id,
            deposit_data,
        } => to_json_binary(&query_calculate_fee(
            deps,
            destination_domain_id,
            resource_id,
            deposit_data,
        )?),
        QueryMsg::ProposalsDigest { proposals } => {
            to_json_binary(&query_proposals_digest(deps, env, proposals)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
