//! Replay protection and deposit counters
//!
//! Consumed inbound nonces live in a sparse bitmap keyed by
//! `(origin domain, nonce >> 8)`; bit `nonce & 255` of the word marks the
//! nonce as used. Bits are only ever set.

use cosmwasm_std::{StdError, StdResult, Storage, Uint256};

use crate::error::ContractError;
use crate::state::{DomainId, DEPOSIT_COUNTS, USED_NONCES};

fn position(nonce: u64) -> (u64, usize) {
    (nonce >> 8, (nonce & 0xff) as usize)
}

fn bit_is_set(word: Uint256, bit: usize) -> bool {
    let bytes = word.to_be_bytes();
    bytes[31 - bit / 8] & (1 << (bit % 8)) != 0
}

fn with_bit(word: Uint256, bit: usize) -> Uint256 {
    let mut bytes = word.to_be_bytes();
    bytes[31 - bit / 8] |= 1 << (bit % 8);
    Uint256::from_be_bytes(bytes)
}

pub fn is_used(storage: &dyn Storage, domain_id: DomainId, nonce: u64) -> StdResult<bool> {
    let (word_index, bit) = position(nonce);
    let word = USED_NONCES
        .may_load(storage, (domain_id, word_index))?
        .unwrap_or_default();
    Ok(bit_is_set(word, bit))
}

/// Idempotent
pub fn mark_used(storage: &mut dyn Storage, domain_id: DomainId, nonce: u64) -> StdResult<()> {
    let (word_index, bit) = position(nonce);
    let key = (domain_id, word_index);
    let word = USED_NONCES.may_load(storage, key)?.unwrap_or_default();
    if !bit_is_set(word, bit) {
        USED_NONCES.save(storage, key, &with_bit(word, bit))?;
    }
    Ok(())
}

// ============================================================================
// Deposit Counters
// ============================================================================

pub fn deposit_count(storage: &dyn Storage, domain_id: DomainId) -> StdResult<u64> {
    Ok(DEPOSIT_COUNTS
        .may_load(storage, domain_id)?
        .unwrap_or_default())
}

/// Allocate the nonce of a new deposit towards `domain_id`; the first is 1
pub fn next_deposit_nonce(storage: &mut dyn Storage, domain_id: DomainId) -> StdResult<u64> {
    let nonce = deposit_count(storage, domain_id)?
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("deposit nonce overflow"))?;
    DEPOSIT_COUNTS.save(storage, domain_id, &nonce)?;
    Ok(nonce)
}

/// Privileged override of the deposit counter; it can only move forward
pub fn set_high_water_mark(
    storage: &mut dyn Storage,
    domain_id: DomainId,
    nonce: u64,
) -> Result<(), ContractError> {
    let current = deposit_count(storage, domain_id)?;
    if nonce < current {
        return Err(ContractError::NonceDecrementsNotAllowed {
            current,
            requested: nonce,
        });
    }
    DEPOSIT_COUNTS.save(storage, domain_id, &nonce)?;
    Ok(())
}
