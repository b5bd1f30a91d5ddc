//! Conversion between a token's native decimals and the canonical
//! 18-decimal precision used on the wire.
//!
//! Amounts going out of a 6-decimal token are scaled up by 10^12; amounts
//! coming in are scaled back down, truncating any dust below the token's
//! precision.

use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;

pub const CANONICAL_DECIMALS: u8 = 18;

/// Largest precision whose scale factor, 10^77, still fits a 256-bit amount
pub const MAX_DECIMALS: u8 = 77;

pub fn validate_decimals(token: &str, decimals: Option<u8>) -> Result<(), ContractError> {
    match decimals {
        Some(d) if d > MAX_DECIMALS => Err(ContractError::UnsupportedToken {
            token: token.to_string(),
            reason: format!("{} decimals exceed the maximum of {}", d, MAX_DECIMALS),
        }),
        _ => Ok(()),
    }
}

fn scale(exponent: u8) -> Result<Uint256, ContractError> {
    Uint256::from(10u8)
        .checked_pow(exponent as u32)
        .map_err(|_| ContractError::ConversionOverflow)
}

/// Token units -> canonical units
pub fn to_canonical(amount: Uint256, decimals: Option<u8>) -> Result<Uint256, ContractError> {
    match decimals {
        Some(d) if d < CANONICAL_DECIMALS => amount
            .checked_mul(scale(CANONICAL_DECIMALS - d)?)
            .map_err(|_| ContractError::ConversionOverflow),
        Some(d) if d > CANONICAL_DECIMALS => Ok(amount / scale(d - CANONICAL_DECIMALS)?),
        _ => Ok(amount),
    }
}

/// Canonical units -> token units, rounding toward zero
pub fn from_canonical(amount: Uint256, decimals: Option<u8>) -> Result<Uint256, ContractError> {
    match decimals {
        Some(d) if d < CANONICAL_DECIMALS => Ok(amount / scale(CANONICAL_DECIMALS - d)?),
        Some(d) if d > CANONICAL_DECIMALS => amount
            .checked_mul(scale(d - CANONICAL_DECIMALS)?)
            .map_err(|_| ContractError::ConversionOverflow),
        _ => Ok(amount),
    }
}

/// Deposit-side conversion: a non-zero amount must not vanish
pub fn to_canonical_deposit(
    amount: Uint256,
    decimals: Option<u8>,
) -> Result<Uint256, ContractError> {
    let canonical = to_canonical(amount, decimals)?;
    if canonical.is_zero() && !amount.is_zero() {
        return Err(ContractError::ConversionUnderflow);
    }
    Ok(canonical)
}

/// Narrow a wire amount to what token contracts and the bank module accept
pub fn to_token_amount(amount: Uint256) -> Result<Uint128, ContractError> {
    Uint128::try_from(amount).map_err(|_| ContractError::ConversionOverflow)
}
