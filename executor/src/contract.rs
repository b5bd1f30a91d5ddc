use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Reply,
    Response, StdResult,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::execution::{
    execute_handle_bridge_message, execute_perform_action, execute_release_allowance,
    execute_transfer_balance, reply_perform_action,
};
use crate::msg::{
    ConfigResponse, ExecuteMsg, HandlerRolesResponse, HasHandlerRoleResponse, InstantiateMsg,
    MigrateMsg, QueryMsg,
};
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DEFAULT_MIN_ACTION_GAS,
    DEFAULT_RECOVERY_GAS, HANDLER_ROLES,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let config = Config {
        admin,
        native_denom: msg.native_denom,
        recovery_gas: msg.recovery_gas.unwrap_or(DEFAULT_RECOVERY_GAS),
        min_action_gas: msg.min_action_gas.unwrap_or(DEFAULT_MIN_ACTION_GAS),
    };
    CONFIG.save(deps.storage, &config)?;

    for handler in &msg.handlers {
        let handler = deps.api.addr_validate(handler)?;
        HANDLER_ROLES.save(deps.storage, &handler, &true)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("native_denom", config.native_denom)
        .add_attribute("handler_count", msg.handlers.len().to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::HandleBridgeMessage {
            asset,
            amount,
            message,
            gas_limit,
        } => execute_handle_bridge_message(deps, env, info, asset, amount, message, gas_limit),
        ExecuteMsg::PerformAction { index } => execute_perform_action(deps, env, info, index),
        ExecuteMsg::ReleaseAllowance {
            token,
            spender,
            restore_to,
        } => execute_release_allowance(deps, env, info, token, spender, restore_to),
        ExecuteMsg::TransferBalance {} => execute_transfer_balance(deps, env, info),
        ExecuteMsg::GrantHandlerRole { account } => execute_grant_handler_role(deps, info, account),
        ExecuteMsg::RevokeHandlerRole { account } => {
            execute_revoke_handler_role(deps, info, account)
        }
        ExecuteMsg::UpdateConfig {
            recovery_gas,
            min_action_gas,
        } => execute_update_config(deps, info, recovery_gas, min_action_gas),
    }
}

fn ensure_admin(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

fn execute_grant_handler_role(
    deps: DepsMut,
    info: MessageInfo,
    account: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    HANDLER_ROLES.save(deps.storage, &account, &true)?;

    Ok(Response::new()
        .add_attribute("action", "grant_handler_role")
        .add_attribute("account", account))
}

fn execute_revoke_handler_role(
    deps: DepsMut,
    info: MessageInfo,
    account: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    HANDLER_ROLES.remove(deps.storage, &account);

    Ok(Response::new()
        .add_attribute("action", "revoke_handler_role")
        .add_attribute("account", account))
}

fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    recovery_gas: Option<u64>,
    min_action_gas: Option<u64>,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(recovery_gas) = recovery_gas {
        config.recovery_gas = recovery_gas;
    }
    if let Some(min_action_gas) = min_action_gas {
        config.min_action_gas = min_action_gas;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("recovery_gas", config.recovery_gas.to_string())
        .add_attribute("min_action_gas", config.min_action_gas.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    reply_perform_action(deps, msg)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::HasHandlerRole { account } => {
            to_json_binary(&query_has_handler_role(deps, account)?)
        }
        QueryMsg::HandlerRoles { start_after, limit } => {
            to_json_binary(&query_handler_roles(deps, start_after, limit)?)
        }
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        native_denom: config.native_denom,
        recovery_gas: config.recovery_gas,
        min_action_gas: config.min_action_gas,
    })
}

fn query_has_handler_role(deps: Deps, account: String) -> StdResult<HasHandlerRoleResponse> {
    let account = deps.api.addr_validate(&account)?;
    Ok(HasHandlerRoleResponse {
        has_role: HANDLER_ROLES.has(deps.storage, &account),
    })
}

fn query_handler_roles(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<HandlerRolesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_addr = start_after.map(Addr::unchecked);
    let start = start_addr.as_ref().map(Bound::exclusive);

    let handlers = HANDLER_ROLES
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<_>>>()?;

    Ok(HandlerRolesResponse { handlers })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
