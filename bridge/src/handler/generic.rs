//! Generic calls: no asset moves, the payload names a contract function to
//! invoke on the destination with the depositor and opaque data.
//!
//! The target receives
//! `{"<function>": {"depositor": "<addr>", "data": "<base64>"}}`
//! under a gas limit equal to the payload's max fee.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_string, Addr, Binary, SubMsg, Uint256, WasmMsg};

use super::{DepositOutcome, ExecutionOutcome, HandlerContext};
use crate::codec::{decode_address, utf8, GenericPayload};
use crate::error::ContractError;

const MAX_FUNCTION_NAME_LEN: usize = 64;

#[cw_serde]
struct GenericCall {
    depositor: String,
    data: Binary,
}

/// Function names become a JSON object key, so only snake_case is allowed
fn validate_function_name(bytes: &[u8]) -> Result<String, ContractError> {
    let invalid = || ContractError::InvalidFunctionName {
        name: String::from_utf8_lossy(bytes).into_owned(),
    };
    let name = std::str::from_utf8(bytes).map_err(|_| invalid())?;
    let valid = !name.is_empty()
        && name.len() <= MAX_FUNCTION_NAME_LEN
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(invalid());
    }
    Ok(name.to_string())
}

fn saturating_u64(value: Uint256) -> u64 {
    let bytes = value.to_be_bytes();
    if bytes[..24].iter().any(|b| *b != 0) {
        return u64::MAX;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..]);
    u64::from_be_bytes(low)
}

pub(super) fn deposit(
    ctx: HandlerContext,
    depositor: &Addr,
    payload: &[u8],
) -> Result<DepositOutcome, ContractError> {
    let generic = GenericPayload::decode(payload)?;

    if generic.depositor != depositor.as_bytes() {
        return Err(ContractError::IncorrectDepositor {
            expected: String::from_utf8_lossy(&generic.depositor).into_owned(),
            got: depositor.to_string(),
        });
    }
    let cap = ctx.config.generic_gas_cap;
    if generic.max_fee > Uint256::from(cap) {
        return Err(ContractError::RequestedFeeTooLarge {
            max_fee: generic.max_fee.to_string(),
            cap,
        });
    }
    validate_function_name(&generic.function)?;

    Ok(DepositOutcome {
        payload: payload.to_vec(),
        response: vec![],
        messages: vec![],
    })
}

pub(super) fn execute(ctx: HandlerContext, payload: &[u8]) -> Result<ExecutionOutcome, ContractError> {
    let generic = GenericPayload::decode(payload)?;
    let function = validate_function_name(&generic.function)?;
    let target = decode_address(ctx.deps.api, &generic.target)?;
    let call = GenericCall {
        depositor: utf8(generic.depositor, "depositor")?,
        data: Binary::from(generic.execution_data),
    };
    let msg = format!("{{\"{}\":{}}}", function, to_json_string(&call)?);

    let mut sub_msg = SubMsg::new(WasmMsg::Execute {
        contract_addr: target,
        msg: Binary::from(msg.into_bytes()),
        funds: vec![],
    });
    // Zero means the call runs under the proposal's own gas
    if !generic.max_fee.is_zero() {
        sub_msg = sub_msg.with_gas_limit(saturating_u64(generic.max_fee));
    }

    Ok(ExecutionOutcome {
        response: vec![],
        messages: vec![sub_msg],
    })
}
