//! Bridged message execution.
//!
//! `HandleBridgeMessage` records a baseline balance for every asset the
//! message may touch, then dispatches one `PerformAction` self-call per
//! action (`reply_on_error`, gas-limited to the stipend) followed by a final
//! `TransferBalance`. Anything above a baseline belongs to the message.

use bridge_common::{Action, AssetInfo, Message};
use cosmwasm_std::{
    to_json_binary, BankMsg, Coin, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo,
    Reply, Response, StdError, SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw20::{AllowanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

use crate::error::ContractError;
use crate::msg::ExecuteMsg;
use crate::state::{Execution, TrackedAsset, CONFIG, EXECUTION, HANDLER_ROLES};

fn ensure_self(env: &Env, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::OnlyExecutor);
    }
    Ok(())
}

fn self_call(env: &Env, msg: &ExecuteMsg) -> Result<WasmMsg, ContractError> {
    Ok(WasmMsg::Execute {
        contract_addr: env.contract.address.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    })
}

fn load_execution(deps: Deps) -> Result<Execution, ContractError> {
    EXECUTION
        .may_load(deps.storage)?
        .ok_or(ContractError::NoExecutionInProgress)
}

/// Balance of `info` above its baseline; untracked assets have none
fn surplus(
    deps: Deps,
    env: &Env,
    execution: &Execution,
    info: &AssetInfo,
) -> Result<Uint128, ContractError> {
    let Some(baseline) = execution.baseline(info) else {
        return Ok(Uint128::zero());
    };
    let balance = info.query_balance(&deps.querier, &env.contract.address)?;
    Ok(balance.saturating_sub(baseline))
}

fn query_allowance(
    deps: Deps,
    env: &Env,
    token: &str,
    spender: &str,
) -> Result<Uint128, ContractError> {
    let res: AllowanceResponse = deps.querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Allowance {
            owner: env.contract.address.to_string(),
            spender: spender.to_string(),
        },
    )?;
    Ok(res.allowance)
}

// ============================================================================
// HandleBridgeMessage
// ============================================================================

pub fn execute_handle_bridge_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    asset: AssetInfo,
    amount: Uint128,
    message: Message,
    gas_limit: u64,
) -> Result<Response, ContractError> {
    if !HANDLER_ROLES.has(deps.storage, &info.sender) {
        return Err(ContractError::InsufficientPermission {
            sender: info.sender.to_string(),
        });
    }
    if EXECUTION.exists(deps.storage) {
        return Err(ContractError::ExecutionInProgress);
    }

    let config = CONFIG.load(deps.storage)?;
    let action_count = message.actions.len() as u64;
    let required = config
        .recovery_gas
        .saturating_add(action_count.saturating_mul(config.min_action_gas));
    if gas_limit < required {
        return Err(ContractError::InsufficientGasLimit {
            required,
            provided: gas_limit,
        });
    }
    let stipend = match action_count {
        0 => 0,
        n => (gas_limit - config.recovery_gas) / n,
    };

    let recipient =
        deps.api
            .addr_validate(&message.recipient)
            .map_err(|e| ContractError::InvalidRecipient {
                reason: e.to_string(),
            })?;

    let tracked = record_baselines(
        deps.as_ref(),
        &env,
        &info.funds,
        &asset,
        amount,
        &config.native_denom,
        &message.actions,
    )?;

    let execution = Execution {
        transaction_id: message.transaction_id,
        asset,
        amount,
        recipient,
        actions: message.actions,
        tracked,
        failed_actions: 0,
    };
    EXECUTION.save(deps.storage, &execution)?;

    let mut submessages = Vec::with_capacity(execution.actions.len() + 1);
    for index in 0..execution.actions.len() as u32 {
        let perform = self_call(&env, &ExecuteMsg::PerformAction { index })?;
        submessages.push(SubMsg::reply_on_error(perform, index as u64).with_gas_limit(stipend));
    }
    submessages.push(SubMsg::new(self_call(&env, &ExecuteMsg::TransferBalance {})?));

    Ok(Response::new()
        .add_submessages(submessages)
        .add_attribute("action", "handle_bridge_message")
        .add_attribute("transaction_id", hex_id(&execution))
        .add_attribute("actions", action_count.to_string())
        .add_attribute("stipend", stipend.to_string()))
}

fn record_baselines(
    deps: Deps,
    env: &Env,
    funds: &[Coin],
    asset: &AssetInfo,
    amount: Uint128,
    native_denom: &str,
    actions: &[Action],
) -> Result<Vec<TrackedAsset>, ContractError> {
    let mut tracked: Vec<TrackedAsset> = vec![];
    let track = |tracked: &mut Vec<TrackedAsset>, info: AssetInfo, baseline: Uint128| {
        if !tracked.iter().any(|t| t.info == info) {
            tracked.push(TrackedAsset { info, baseline });
        }
    };
    let balance = |info: &AssetInfo| info.query_balance(&deps.querier, &env.contract.address);

    // Attached coins arrived with this call
    for coin in funds {
        let info = AssetInfo::native(&coin.denom);
        let baseline = balance(&info)?
            .checked_sub(coin.amount)
            .map_err(StdError::from)?;
        track(&mut tracked, info, baseline);
    }

    // The credited asset was moved in just before the call
    let baseline = balance(asset)?
        .checked_sub(amount)
        .map_err(StdError::from)?;
    track(&mut tracked, asset.clone(), baseline);

    let native = AssetInfo::native(native_denom);
    let native_balance = balance(&native)?;
    track(&mut tracked, native, native_balance);

    for token in actions
        .iter()
        .flat_map(|action| [&action.token_send, &action.token_receive])
        .filter(|token| !token.is_empty())
    {
        let Ok(addr) = deps.api.addr_validate(token) else {
            continue;
        };
        let info = AssetInfo::cw20(addr);
        if let Ok(current) = balance(&info) {
            track(&mut tracked, info, current);
        }
    }

    Ok(tracked)
}

// ============================================================================
// PerformAction
// ============================================================================

pub fn execute_perform_action(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    index: u32,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;
    let execution = load_execution(deps.as_ref())?;
    let action = execution
        .actions
        .get(index as usize)
        .ok_or(ContractError::InvalidActionIndex { index })?;
    let config = CONFIG.load(deps.storage)?;

    let call_to = deps.api.addr_validate(&action.call_to)?;
    let is_contract = deps.querier.query_wasm_contract_info(&call_to).is_ok();
    if !is_contract && !action.data.is_empty() {
        return Err(ContractError::NotAContract {
            address: call_to.to_string(),
        });
    }

    let mut funds = vec![];
    if !action.native_value.is_zero() {
        let native = AssetInfo::native(&config.native_denom);
        let available = surplus(deps.as_ref(), &env, &execution, &native)?;
        if action.native_value > available {
            return Err(ContractError::InsufficientNativeValue {
                requested: action.native_value.to_string(),
                available: available.to_string(),
            });
        }
        funds.push(Coin {
            denom: config.native_denom.clone(),
            amount: action.native_value,
        });
    }

    let mut messages: Vec<CosmosMsg> = vec![];

    // Scoped allowance: only what the message itself owns of token_send
    let approval = if action.has_approval() {
        let token = deps.api.addr_validate(&action.token_send)?;
        let spender = deps.api.addr_validate(&action.approve_to)?;
        let owned = surplus(deps.as_ref(), &env, &execution, &AssetInfo::cw20(token.clone()))?;
        // Allowance the spender already held; the release returns to it
        let standing = query_allowance(deps.as_ref(), &env, token.as_str(), spender.as_str())?;
        if !owned.is_zero() {
            messages.push(
                WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    msg: to_json_binary(&Cw20ExecuteMsg::IncreaseAllowance {
                        spender: spender.to_string(),
                        amount: owned,
                        expires: None,
                    })?,
                    funds: vec![],
                }
                .into(),
            );
        }
        Some((token, spender, standing))
    } else {
        None
    };

    if is_contract {
        messages.push(
            WasmMsg::Execute {
                contract_addr: call_to.to_string(),
                msg: action.data.clone(),
                funds,
            }
            .into(),
        );
    } else if !funds.is_empty() {
        messages.push(
            BankMsg::Send {
                to_address: call_to.to_string(),
                amount: funds,
            }
            .into(),
        );
    }

    if let Some((token, spender, standing)) = approval {
        messages.push(
            self_call(
                &env,
                &ExecuteMsg::ReleaseAllowance {
                    token: token.to_string(),
                    spender: spender.to_string(),
                    restore_to: standing,
                },
            )?
            .into(),
        );
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "perform_action")
        .add_attribute("index", index.to_string())
        .add_attribute("call_to", call_to))
}

pub fn execute_release_allowance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    spender: String,
    restore_to: Uint128,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;

    let current = query_allowance(deps.as_ref(), &env, &token, &spender)?;
    let released = current.saturating_sub(restore_to);

    let mut response = Response::new()
        .add_attribute("action", "release_allowance")
        .add_attribute("token", &token)
        .add_attribute("spender", &spender)
        .add_attribute("released", released.to_string());

    if !released.is_zero() {
        response = response.add_message(WasmMsg::Execute {
            contract_addr: token,
            msg: to_json_binary(&Cw20ExecuteMsg::DecreaseAllowance {
                spender,
                amount: released,
                expires: None,
            })?,
            funds: vec![],
        });
    }

    Ok(response)
}

/// Count and report a reverted action; its state changes are already gone
pub fn reply_perform_action(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let mut execution = load_execution(deps.as_ref())?;

    let error = match msg.result {
        SubMsgResult::Err(error) => error,
        SubMsgResult::Ok(_) => return Ok(Response::new()),
    };
    execution.failed_actions += 1;
    EXECUTION.save(deps.storage, &execution)?;

    Ok(Response::new().add_event(
        Event::new("action_reverted")
            .add_attribute("transaction_id", hex_id(&execution))
            .add_attribute("index", msg.id.to_string())
            .add_attribute("error", error),
    ))
}

// ============================================================================
// TransferBalance
// ============================================================================

pub fn execute_transfer_balance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;
    let execution = load_execution(deps.as_ref())?;

    let mut messages = vec![];
    let mut returned = Uint128::zero();
    for tracked in &execution.tracked {
        let owned = surplus(deps.as_ref(), &env, &execution, &tracked.info)?;
        if owned.is_zero() {
            continue;
        }
        if tracked.info == execution.asset {
            returned = owned;
        }
        messages.push(tracked.info.transfer_msg(execution.recipient.as_str(), owned)?);
    }
    EXECUTION.remove(deps.storage);

    let event = if execution.failed_actions == 0 {
        Event::new("executed")
            .add_attribute("transaction_id", hex_id(&execution))
            .add_attribute("recipient", execution.recipient.as_str())
            .add_attribute("returned", returned.to_string())
    } else {
        Event::new("transfer_recovered")
            .add_attribute("transaction_id", hex_id(&execution))
            .add_attribute("token", execution.asset.to_string())
            .add_attribute("recipient", execution.recipient.as_str())
            .add_attribute("amount", execution.amount.to_string())
            .add_attribute("returned", returned.to_string())
            .add_attribute(
                "transferred_by_actions",
                execution.amount.saturating_sub(returned).to_string(),
            )
            .add_attribute("failed_actions", execution.failed_actions.to_string())
    };

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("action", "transfer_balance"))
}

fn hex_id(execution: &Execution) -> String {
    format!("0x{}", hex::encode(execution.transaction_id.as_slice()))
}
