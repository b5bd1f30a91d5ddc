//! Fee Manager Module
//!
//! Deposit fees are configured per `(destination domain, resource id)` pair.
//! A route without a strategy is free.
//!
//! ## Strategies
//!
//! | Strategy   | Paid in                    | Amount                                  |
//! |------------|----------------------------|-----------------------------------------|
//! | Flat       | attached native coins      | fixed `amount` of `denom`               |
//! | Percentage | the deposited asset itself | `fee_bps` of the deposit, clamped to `[min_fee, max_fee]` |
//!
//! Flat fees must be attached exactly; percentage fees are pulled alongside
//! the deposit (cw20 allowance) or attached on top of it (native coins).

use bridge_common::AssetInfo;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage, Uint128};
use cw_storage_plus::Map;

use crate::error::ContractError;
use crate::state::{DomainId, HandlerKind, ResourceRecord};

// ============================================================================
// Constants
// ============================================================================

/// Maximum percentage fee in basis points (10% = 1000 bps)
pub const MAX_FEE_BPS: u64 = 1000;

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10000;

// ============================================================================
// Data Structures
// ============================================================================

#[cw_serde]
pub enum FeeStrategy {
    /// Fixed fee in a native denom
    Flat { denom: String, amount: Uint128 },
    /// Share of the deposited amount; `max_fee` of zero means uncapped
    Percentage {
        fee_bps: u64,
        min_fee: Uint128,
        max_fee: Uint128,
    },
}

impl FeeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStrategy::Flat { .. } => "flat",
            FeeStrategy::Percentage { .. } => "percentage",
        }
    }

    /// Validate the strategy against the resource it is attached to
    pub fn validate(&self, handler: HandlerKind) -> Result<(), ContractError> {
        match self {
            FeeStrategy::Flat { denom, .. } => {
                if denom.is_empty() {
                    return Err(ContractError::InvalidFeeStrategy {
                        reason: "flat fee denom is empty".to_string(),
                    });
                }
            }
            FeeStrategy::Percentage {
                fee_bps,
                min_fee,
                max_fee,
            } => {
                if !matches!(handler, HandlerKind::Fungible | HandlerKind::Native) {
                    return Err(ContractError::InvalidFeeStrategy {
                        reason: format!(
                            "percentage fees need an amount, {} resources have none",
                            handler.as_str()
                        ),
                    });
                }
                if *fee_bps > MAX_FEE_BPS {
                    return Err(ContractError::InvalidFeeStrategy {
                        reason: format!("fee {} bps exceeds max {}", fee_bps, MAX_FEE_BPS),
                    });
                }
                if !max_fee.is_zero() && max_fee < min_fee {
                    return Err(ContractError::InvalidFeeStrategy {
                        reason: "max_fee is below min_fee".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Fee owed for one deposit
#[cw_serde]
pub struct FeeQuote {
    pub asset: AssetInfo,
    pub amount: Uint128,
}

// ============================================================================
// Storage
// ============================================================================

/// (destination domain, resource id) -> strategy
pub const FEE_STRATEGIES: Map<(DomainId, &[u8]), FeeStrategy> = Map::new("fee_strategies");

pub fn set_fee_strategy(
    storage: &mut dyn Storage,
    destination_domain_id: DomainId,
    resource_id: &[u8],
    strategy: Option<FeeStrategy>,
) -> Result<(), ContractError> {
    match strategy {
        Some(strategy) => FEE_STRATEGIES.save(
            storage,
            (destination_domain_id, resource_id),
            &strategy,
        )?,
        None => FEE_STRATEGIES.remove(storage, (destination_domain_id, resource_id)),
    }
    Ok(())
}

// ============================================================================
// Fee Calculation Functions
// ============================================================================

/// Quote the fee for a deposit of `amount` (token units) along a route
///
/// `amount` is `None` for resources without a fungible amount; only flat
/// strategies apply to those.
pub fn calculate_fee(
    storage: &dyn Storage,
    destination_domain_id: DomainId,
    resource_id: &[u8],
    record: &ResourceRecord,
    amount: Option<Uint128>,
) -> Result<Option<FeeQuote>, ContractError> {
    let Some(strategy) = FEE_STRATEGIES.may_load(storage, (destination_domain_id, resource_id))?
    else {
        return Ok(None);
    };

    let quote = match strategy {
        FeeStrategy::Flat { denom, amount } => FeeQuote {
            asset: AssetInfo::native(denom),
            amount,
        },
        FeeStrategy::Percentage {
            fee_bps,
            min_fee,
            max_fee,
        } => {
            let amount = amount.ok_or_else(|| ContractError::InvalidFeeStrategy {
                reason: format!("{} deposits carry no amount", record.handler.as_str()),
            })?;
            FeeQuote {
                asset: deposited_asset(record),
                amount: clamp_fee(calculate_fee_from_bps(amount, fee_bps), min_fee, max_fee),
            }
        }
    };

    Ok(Some(quote))
}

fn deposited_asset(record: &ResourceRecord) -> AssetInfo {
    match record.handler {
        HandlerKind::Native => AssetInfo::native(&record.token),
        _ => AssetInfo::cw20(Addr::unchecked(&record.token)),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Calculate fee amount from amount and bps
pub fn calculate_fee_from_bps(amount: Uint128, fee_bps: u64) -> Uint128 {
    amount.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR)
}

fn clamp_fee(fee: Uint128, min_fee: Uint128, max_fee: Uint128) -> Uint128 {
    let fee = fee.max(min_fee);
    if max_fee.is_zero() {
        fee
    } else {
        fee.min(max_fee)
    }
}
