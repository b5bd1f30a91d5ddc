//! Outgoing deposits.
//!
//! A deposit quotes and collects the route's fee, lets the resource's handler
//! lock or burn the asset, allocates the next nonce towards the destination
//! domain and emits the `deposit` event relayers pick up.

use bridge_common::AssetInfo;
use cosmwasm_std::{
    wasm_execute, Addr, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo,
    Response, Uint128,
};
use cw20::Cw20ExecuteMsg;

use super::ensure_active;
use crate::error::ContractError;
use crate::fee_manager::{calculate_fee, FeeQuote};
use crate::handler::{self, HandlerContext};
use crate::hash::to_hex;
use crate::nonce::next_deposit_nonce;
use crate::resource::{load_resource, parse_resource_id};
use crate::state::{DomainId, HandlerKind, CONFIG};

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_domain_id: DomainId,
    resource_id: Binary,
    deposit_data: Binary,
    fee_data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_active(&config)?;

    if destination_domain_id == config.domain_id {
        return Err(ContractError::DepositToCurrentDomain {
            domain_id: destination_domain_id,
        });
    }

    let resource = parse_resource_id(&resource_id)?;
    let (record, properties) = load_resource(deps.storage, &resource)?;
    if !properties.is_whitelisted {
        return Err(ContractError::ContractNotWhitelisted {
            token: record.token,
        });
    }

    // Fee and attached coins are settled before the asset moves
    let amount = handler::deposit_amount(record.handler, &deposit_data)?;
    let fee = calculate_fee(
        deps.storage,
        destination_domain_id,
        &resource,
        &record,
        amount,
    )?;
    let native_deposit = match (record.handler, amount) {
        (HandlerKind::Native, Some(amount)) => Some(Coin {
            denom: record.token.clone(),
            amount,
        }),
        _ => None,
    };
    check_attached_funds(&info.funds, native_deposit.as_ref(), fee.as_ref())?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if let Some(quote) = &fee {
        messages.extend(collect_fee_msg(quote, &info.sender, &config.fee_recipient)?);
    }

    let outcome = {
        let ctx = HandlerContext {
            deps: deps.as_ref(),
            env: &env,
            config: &config,
            token: &record.token,
            properties: &properties,
        };
        handler::deposit(ctx, record.handler, &info.sender, &deposit_data)?
    };
    messages.extend(outcome.messages);

    let deposit_nonce = next_deposit_nonce(deps.storage, destination_domain_id)?;

    let event = Event::new("deposit")
        .add_attribute("destination_domain_id", destination_domain_id.to_string())
        .add_attribute("resource_id", to_hex(&resource))
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("depositor", info.sender.to_string())
        .add_attribute("data", to_hex(&outcome.payload))
        .add_attribute("handler_response", to_hex(&outcome.response))
        .add_attribute("fee_data", to_hex(&fee_data));

    let (fee_asset, fee_amount) = match &fee {
        Some(quote) => (quote.asset.to_string(), quote.amount),
        None => (String::new(), Uint128::zero()),
    };

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "deposit")
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("handler", record.handler.as_str())
        .add_attribute("fee_asset", fee_asset)
        .add_attribute("fee", fee_amount.to_string()))
}

/// Attached coins must cover the native deposit and the native fee exactly
fn check_attached_funds(
    funds: &[Coin],
    deposit: Option<&Coin>,
    fee: Option<&FeeQuote>,
) -> Result<(), ContractError> {
    let attached = |denom: &str| -> Uint128 {
        funds
            .iter()
            .filter(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .sum()
    };
    let native_fee = fee.and_then(|quote| match &quote.asset {
        AssetInfo::Native { denom } => Some(Coin {
            denom: denom.clone(),
            amount: quote.amount,
        }),
        AssetInfo::Cw20 { .. } => None,
    });
    let owed_in = |coin: Option<&Coin>, denom: &str| -> Uint128 {
        coin.filter(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .unwrap_or_default()
    };

    if let Some(fee) = &native_fee {
        let supplied = attached(&fee.denom).saturating_sub(owed_in(deposit, &fee.denom));
        if supplied != fee.amount {
            return Err(ContractError::IncorrectFeeSupplied {
                expected: fee.to_string(),
                got: Coin::new(supplied.u128(), &fee.denom).to_string(),
            });
        }
    }

    if let Some(deposit) = deposit {
        let supplied =
            attached(&deposit.denom).saturating_sub(owed_in(native_fee.as_ref(), &deposit.denom));
        if supplied != deposit.amount {
            return Err(ContractError::IncorrectDepositAmount {
                expected: deposit.to_string(),
                got: Coin::new(supplied.u128(), &deposit.denom).to_string(),
            });
        }
    }

    let unexpected = funds.iter().find(|coin| {
        !coin.amount.is_zero()
            && owed_in(deposit, &coin.denom).is_zero()
            && owed_in(native_fee.as_ref(), &coin.denom).is_zero()
    });
    if let Some(coin) = unexpected {
        return Err(ContractError::IncorrectFeeSupplied {
            expected: native_fee
                .map(|fee| fee.to_string())
                .unwrap_or_else(|| "no fee".to_string()),
            got: coin.to_string(),
        });
    }

    Ok(())
}

/// Forward the fee to the fee recipient; cw20 fees are pulled from the
/// depositor's allowance next to the deposit itself
fn collect_fee_msg(
    quote: &FeeQuote,
    depositor: &Addr,
    fee_recipient: &Addr,
) -> Result<Option<CosmosMsg>, ContractError> {
    if quote.amount.is_zero() {
        return Ok(None);
    }
    let msg = match &quote.asset {
        AssetInfo::Native { denom } => BankMsg::Send {
            to_address: fee_recipient.to_string(),
            amount: vec![Coin {
                denom: denom.clone(),
                amount: quote.amount,
            }],
        }
        .into(),
        AssetInfo::Cw20 { contract_addr } => wasm_execute(
            contract_addr,
            &Cw20ExecuteMsg::TransferFrom {
                owner: depositor.to_string(),
                recipient: fee_recipient.to_string(),
                amount: quote.amount,
            },
            vec![],
        )?
        .into(),
    };
    Ok(Some(msg))
}

/// Ask relayers to look at a deposit transaction again
pub fn execute_retry(deposit_tx_hash: String) -> Result<Response, ContractError> {
    Ok(Response::new()
        .add_event(Event::new("retry").add_attribute("deposit_tx_hash", deposit_tx_hash.clone()))
        .add_attribute("method", "retry")
        .add_attribute("deposit_tx_hash", deposit_tx_hash))
}
