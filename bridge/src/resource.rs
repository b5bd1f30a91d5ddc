//! Resource registry: which handler and token a resource id routes to, and
//! the per-token properties the handlers consult.

use bridge_common::multi_token::{MultiTokenBalanceResponse, MultiTokenQueryMsg};
use cosmwasm_std::{Binary, DepsMut, Env, QuerierWrapper, Storage};

use crate::decimals::validate_decimals;
use crate::error::ContractError;
use crate::hash::to_hex;
use crate::msg::Registration;
use crate::state::{HandlerKind, ResourceRecord, TokenProperties, RESOURCES, TOKEN_PROPERTIES};

pub type ResourceId = [u8; 32];

pub fn parse_resource_id(resource_id: &Binary) -> Result<ResourceId, ContractError> {
    resource_id
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidResourceId {
            got: resource_id.len(),
        })
}

/// Validate the token for its handler kind and write fresh properties
///
/// Re-registering a resource or token overwrites the previous record, so
/// burnable mode must be enabled again afterwards.
pub fn register(
    deps: DepsMut,
    env: &Env,
    resource_id: &ResourceId,
    token: &str,
    registration: &Registration,
) -> Result<ResourceRecord, ContractError> {
    let handler = registration.handler();
    let token = match handler {
        HandlerKind::Native => validate_denom(token)?,
        _ => deps.api.addr_validate(token)?.into_string(),
    };
    validate_decimals(&token, registration.decimals())?;

    if handler == HandlerKind::MultiToken {
        probe_multi_token(&deps.querier, env, &token)?;
    }

    let record = ResourceRecord {
        handler,
        token: token.clone(),
    };
    RESOURCES.save(deps.storage, resource_id, &record)?;
    TOKEN_PROPERTIES.save(
        deps.storage,
        &token,
        &TokenProperties {
            resource_id: Binary::from(resource_id.to_vec()),
            is_whitelisted: true,
            is_burnable: false,
            decimals: registration.decimals(),
        },
    )?;

    Ok(record)
}

fn validate_denom(denom: &str) -> Result<String, ContractError> {
    let valid = (3..=128).contains(&denom.len())
        && denom.starts_with(|c: char| c.is_ascii_alphabetic())
        && denom
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if !valid {
        return Err(ContractError::UnsupportedToken {
            token: denom.to_string(),
            reason: "invalid bank denom".to_string(),
        });
    }
    Ok(denom.to_string())
}

/// A multi-token contract must answer the cw1155 balance query
fn probe_multi_token(
    querier: &QuerierWrapper,
    env: &Env,
    token: &str,
) -> Result<(), ContractError> {
    querier
        .query_wasm_smart::<MultiTokenBalanceResponse>(
            token,
            &MultiTokenQueryMsg::Balance {
                owner: env.contract.address.to_string(),
                token_id: "0".to_string(),
            },
        )
        .map(|_| ())
        .map_err(|err| ContractError::UnsupportedToken {
            token: token.to_string(),
            reason: format!("not a multi-token contract: {}", err),
        })
}

pub fn set_burnable(storage: &mut dyn Storage, token: &str) -> Result<TokenProperties, ContractError> {
    let mut properties = load_token_properties(storage, token)?;
    let record = load_record(storage, &parse_resource_id(&properties.resource_id)?)?;

    if matches!(record.handler, HandlerKind::Native | HandlerKind::Generic) {
        return Err(ContractError::BurnableNotSupported {
            handler: record.handler.as_str().to_string(),
        });
    }

    properties.is_burnable = true;
    TOKEN_PROPERTIES.save(storage, token, &properties)?;
    Ok(properties)
}

pub fn load_token_properties(
    storage: &dyn Storage,
    token: &str,
) -> Result<TokenProperties, ContractError> {
    TOKEN_PROPERTIES
        .may_load(storage, token)?
        .ok_or_else(|| ContractError::TokenNotRegistered {
            token: token.to_string(),
        })
}

pub fn load_record(
    storage: &dyn Storage,
    resource_id: &ResourceId,
) -> Result<ResourceRecord, ContractError> {
    RESOURCES
        .may_load(storage, resource_id)?
        .ok_or_else(|| ContractError::ResourceIdNotMappedToHandler {
            resource_id: to_hex(resource_id),
        })
}

/// Routing record plus the properties of its token
///
/// A token re-registered under a different resource id leaves the old
/// resource unroutable.
pub fn load_resource(
    storage: &dyn Storage,
    resource_id: &ResourceId,
) -> Result<(ResourceRecord, TokenProperties), ContractError> {
    let record = load_record(storage, resource_id)?;
    let properties = TOKEN_PROPERTIES
        .may_load(storage, &record.token)?
        .filter(|properties| properties.resource_id.as_slice() == resource_id)
        .ok_or_else(|| ContractError::ResourceIdNotMappedToHandler {
            resource_id: to_hex(resource_id),
        })?;
    Ok((record, properties))
}
