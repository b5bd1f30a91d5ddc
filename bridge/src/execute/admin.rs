//! Admin operations handlers.
//!
//! Every handler here is gated by the access-control table:
//! - Resource registry (set resource, set burnable)
//! - Deposit nonce override
//! - Pause/unpause
//! - Asset withdrawal
//! - Fee routes and recipient
//! - Key generation lifecycle
//! - Capability grants

use cosmwasm_std::{Binary, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use crate::access::{
    ensure_access, grant, ADMIN_PAUSE_TRANSFERS, ADMIN_SET_BURNABLE, ADMIN_SET_DEPOSIT_NONCE,
    ADMIN_SET_FEE, ADMIN_SET_FEE_RECIPIENT, ADMIN_SET_RESOURCE, ADMIN_UNPAUSE_TRANSFERS,
    ADMIN_WITHDRAW, END_KEYGEN, GRANT_ACCESS, REFRESH_KEY, START_KEYGEN,
};
use crate::error::ContractError;
use crate::fee_manager::{set_fee_strategy, FeeStrategy};
use crate::handler::{self, HandlerContext};
use crate::hash::{parse_hex, to_hex};
use crate::msg::Registration;
use crate::nonce::set_high_water_mark;
use crate::resource::{self, load_resource, load_record, parse_resource_id};
use crate::state::{DomainId, CONFIG};

// ============================================================================
// Resource Registry
// ============================================================================

pub fn execute_set_resource(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    resource_id: Binary,
    token: String,
    registration: Registration,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_SET_RESOURCE)?;
    let resource_id = parse_resource_id(&resource_id)?;

    let record = resource::register(deps, &env, &resource_id, &token, &registration)?;

    Ok(Response::new()
        .add_attribute("method", "admin_set_resource")
        .add_attribute("resource_id", to_hex(&resource_id))
        .add_attribute("handler", record.handler.as_str())
        .add_attribute("token", record.token)
        .add_attribute(
            "decimals",
            registration
                .decimals()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ))
}

pub fn execute_set_burnable(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_SET_BURNABLE)?;
    let properties = resource::set_burnable(deps.storage, &token)?;

    Ok(Response::new()
        .add_attribute("method", "admin_set_burnable")
        .add_attribute("token", token)
        .add_attribute("resource_id", to_hex(&properties.resource_id)))
}

// ============================================================================
// Nonces
// ============================================================================

pub fn execute_set_deposit_nonce(
    deps: DepsMut,
    info: MessageInfo,
    domain_id: DomainId,
    nonce: u64,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_SET_DEPOSIT_NONCE)?;
    set_high_water_mark(deps.storage, domain_id, nonce)?;

    Ok(Response::new()
        .add_attribute("method", "admin_set_deposit_nonce")
        .add_attribute("domain_id", domain_id.to_string())
        .add_attribute("nonce", nonce.to_string()))
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause deposits and proposal execution.
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_PAUSE_TRANSFERS)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "admin_pause_transfers"))
}

/// Resume deposits and proposal execution; the MPC address must exist.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_UNPAUSE_TRANSFERS)?;

    let mut config = CONFIG.load(deps.storage)?;
    if config.mpc_address.is_none() {
        return Err(ContractError::MpcAddressNotSet);
    }
    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "admin_unpause_transfers"))
}

// ============================================================================
// Asset Withdrawal
// ============================================================================

/// Move assets the bridge holds for a resource to `recipient`.
pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    resource_id: Binary,
    recipient: String,
    amount: Uint128,
    token_id: Option<String>,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_WITHDRAW)?;

    let config = CONFIG.load(deps.storage)?;
    let resource_id = parse_resource_id(&resource_id)?;
    let (record, properties) = load_resource(deps.storage, &resource_id)?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let ctx = HandlerContext {
        deps: deps.as_ref(),
        env: &env,
        config: &config,
        token: &record.token,
        properties: &properties,
    };
    let messages = handler::withdraw(
        ctx,
        record.handler,
        recipient.as_str(),
        amount,
        token_id.clone(),
    )?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "admin_withdraw")
        .add_attribute("resource_id", to_hex(&resource_id))
        .add_attribute("token", record.token)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount.to_string())
        .add_attribute("token_id", token_id.unwrap_or_default()))
}

// ============================================================================
// Fees
// ============================================================================

pub fn execute_set_fee(
    deps: DepsMut,
    info: MessageInfo,
    destination_domain_id: DomainId,
    resource_id: Binary,
    strategy: Option<FeeStrategy>,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_SET_FEE)?;
    let resource_id = parse_resource_id(&resource_id)?;

    let record = load_record(deps.storage, &resource_id)?;
    if let Some(strategy) = &strategy {
        strategy.validate(record.handler)?;
    }
    let kind = strategy
        .as_ref()
        .map(|s| s.as_str())
        .unwrap_or("none");
    set_fee_strategy(deps.storage, destination_domain_id, &resource_id, strategy)?;

    Ok(Response::new()
        .add_attribute("method", "admin_set_fee")
        .add_attribute("destination_domain_id", destination_domain_id.to_string())
        .add_attribute("resource_id", to_hex(&resource_id))
        .add_attribute("strategy", kind))
}

pub fn execute_set_fee_recipient(
    deps: DepsMut,
    info: MessageInfo,
    fee_recipient: String,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, ADMIN_SET_FEE_RECIPIENT)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.fee_recipient = deps.api.addr_validate(&fee_recipient)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "admin_set_fee_recipient")
        .add_attribute("fee_recipient", config.fee_recipient))
}

// ============================================================================
// Key Generation
// ============================================================================

pub fn execute_start_keygen(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, START_KEYGEN)?;

    let config = CONFIG.load(deps.storage)?;
    if config.mpc_address.is_some() {
        return Err(ContractError::MpcAddressAlreadySet);
    }

    Ok(Response::new()
        .add_event(Event::new("start_keygen"))
        .add_attribute("method", "start_keygen"))
}

/// Record the MPC address; it can never change afterwards.
pub fn execute_end_keygen(
    deps: DepsMut,
    info: MessageInfo,
    mpc_address: String,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, END_KEYGEN)?;

    let mut config = CONFIG.load(deps.storage)?;
    if config.mpc_address.is_some() {
        return Err(ContractError::MpcAddressIsNotUpdatable);
    }

    let address = parse_hex(&mpc_address).map_err(|e| ContractError::InvalidMpcAddress {
        reason: e.to_string(),
    })?;
    if address.len() != 20 {
        return Err(ContractError::InvalidMpcAddress {
            reason: format!("expected 20 bytes, got {}", address.len()),
        });
    }
    if address.iter().all(|b| *b == 0) {
        return Err(ContractError::InvalidMpcAddress {
            reason: "zero address".to_string(),
        });
    }

    config.mpc_address = Some(Binary::from(address.clone()));
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_event(Event::new("end_keygen").add_attribute("mpc_address", to_hex(&address)))
        .add_attribute("method", "end_keygen"))
}

/// Advisory only: relayers refresh their key shares, the address is unchanged.
pub fn execute_refresh_key(
    deps: DepsMut,
    info: MessageInfo,
    hash: String,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, REFRESH_KEY)?;

    Ok(Response::new()
        .add_event(Event::new("key_refresh").add_attribute("hash", hash))
        .add_attribute("method", "refresh_key"))
}

// ============================================================================
// Access Control
// ============================================================================

pub fn execute_grant_access(
    deps: DepsMut,
    info: MessageInfo,
    function: String,
    account: String,
) -> Result<Response, ContractError> {
    ensure_access(deps.storage, &info.sender, GRANT_ACCESS)?;

    let account = deps.api.addr_validate(&account)?;
    grant(deps.storage, &function, &account)?;

    Ok(Response::new()
        .add_attribute("method", "grant_access")
        .add_attribute("function", function)
        .add_attribute("account", account))
}
