//! Query handlers for the domain bridge contract.

use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::fee_manager::calculate_fee;
use crate::handler;
use crate::hash::to_hex;
use crate::msg::{
    AccessHolderResponse, ConfigResponse, DepositCountResponse, FeeQuoteResponse,
    IsProposalExecutedResponse, Proposal, ProposalsDigestResponse, ResourceResponse,
    ResourcesResponse, StatusResponse, TokenPropertiesResponse,
};
use crate::nonce::{deposit_count, is_used};
use crate::resource::{load_record, load_token_properties, parse_resource_id};
use crate::signature::proposals_digest;
use crate::state::{DomainId, ResourceRecord, ACCESS_CONTROL, CONFIG, RESOURCES, TOKEN_PROPERTIES};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

fn std_err(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        other => StdError::generic_err(other.to_string()),
    }
}

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        domain_id: config.domain_id,
        chain_id: config.chain_id,
        paused: config.paused,
        mpc_address: config.mpc_address.as_ref().map(|address| to_hex(address)),
        fee_recipient: config.fee_recipient,
        generic_gas_cap: config.generic_gas_cap,
    })
}

pub fn query_status(deps: Deps) -> StdResult<StatusResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(StatusResponse {
        status: config.status(),
    })
}

// ============================================================================
// Nonce Queries
// ============================================================================

pub fn query_is_proposal_executed(
    deps: Deps,
    domain_id: DomainId,
    deposit_nonce: u64,
) -> StdResult<IsProposalExecutedResponse> {
    Ok(IsProposalExecutedResponse {
        executed: is_used(deps.storage, domain_id, deposit_nonce)?,
    })
}

pub fn query_deposit_count(deps: Deps, domain_id: DomainId) -> StdResult<DepositCountResponse> {
    Ok(DepositCountResponse {
        domain_id,
        count: deposit_count(deps.storage, domain_id)?,
    })
}

// ============================================================================
// Registry Queries
// ============================================================================

fn resource_response(
    deps: Deps,
    resource_id: Vec<u8>,
    record: ResourceRecord,
) -> StdResult<ResourceResponse> {
    // Properties are reported only while the token still routes here
    let properties = TOKEN_PROPERTIES
        .may_load(deps.storage, &record.token)?
        .filter(|properties| properties.resource_id.as_slice() == resource_id.as_slice());
    Ok(ResourceResponse {
        resource_id: Binary::from(resource_id),
        handler: record.handler,
        token: record.token,
        properties,
    })
}

pub fn query_resource(deps: Deps, resource_id: Binary) -> StdResult<ResourceResponse> {
    let resource = parse_resource_id(&resource_id).map_err(std_err)?;
    let record = load_record(deps.storage, &resource).map_err(std_err)?;
    resource_response(deps, resource.to_vec(), record)
}

/// Paginated list of registered resources, ordered by resource id
pub fn query_resources(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<ResourcesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|b| Bound::exclusive(b.as_slice()));

    let resources = RESOURCES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (resource_id, record) = item?;
            resource_response(deps, resource_id, record)
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ResourcesResponse { resources })
}

pub fn query_token_properties(deps: Deps, token: String) -> StdResult<TokenPropertiesResponse> {
    let properties = load_token_properties(deps.storage, &token).map_err(std_err)?;
    Ok(TokenPropertiesResponse { token, properties })
}

pub fn query_access_holder(deps: Deps, function: String) -> StdResult<AccessHolderResponse> {
    let account = ACCESS_CONTROL.may_load(deps.storage, &function)?;
    Ok(AccessHolderResponse { function, account })
}

// ============================================================================
// Fee & Signature Queries
// ============================================================================

/// Fee a deposit with `deposit_data` would be charged along the route
pub fn query_calculate_fee(
    deps: Deps,
    destination_domain_id: DomainId,
    resource_id: Binary,
    deposit_data: Binary,
) -> StdResult<FeeQuoteResponse> {
    let resource = parse_resource_id(&resource_id).map_err(std_err)?;
    let record = load_record(deps.storage, &resource).map_err(std_err)?;
    let amount = handler::deposit_amount(record.handler, &deposit_data).map_err(std_err)?;
    let fee = calculate_fee(
        deps.storage,
        destination_domain_id,
        &resource,
        &record,
        amount,
    )
    .map_err(std_err)?;
    Ok(FeeQuoteResponse { fee })
}

pub fn query_proposals_digest(
    deps: Deps,
    env: Env,
    proposals: Vec<Proposal>,
) -> StdResult<ProposalsDigestResponse> {
    let config = CONFIG.load(deps.storage)?;
    let digest = proposals_digest(config.chain_id, env.contract.address.as_str(), &proposals)
        .map_err(std_err)?;
    Ok(ProposalsDigestResponse {
        digest: Binary::from(digest.to_vec()),
    })
}
