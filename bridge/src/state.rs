//! State definitions for the domain bridge contract
//!
//! Storage is split by concern: bridge configuration and lifecycle, the
//! resource registry, replay-protection bitmaps and deposit counters, the
//! access-control table and the in-flight proposal context used by `reply`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint256};
use cw_storage_plus::{Item, Map};

/// One-byte identifier of a chain participating in the bridge network.
pub type DomainId = u8;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Domain id of the chain this bridge lives on
    pub domain_id: DomainId,
    /// Numeric chain id bound into every proposal signature
    pub chain_id: u64,
    /// Whether deposits and proposal execution are paused
    pub paused: bool,
    /// 20-byte secp256k1 address of the MPC signer, set once by `EndKeygen`
    pub mpc_address: Option<Binary>,
    /// Receiver of collected deposit fees
    pub fee_recipient: Addr,
    /// Upper bound on the gas a generic deposit may request for its call
    pub generic_gas_cap: u64,
}

/// Lifecycle status derived from the configuration
#[cw_serde]
pub enum BridgeStatus {
    /// No MPC address yet; nothing can be executed
    KeygenPending,
    Paused,
    Active,
}

impl Config {
    pub fn status(&self) -> BridgeStatus {
        if self.mpc_address.is_none() {
            BridgeStatus::KeygenPending
        } else if self.paused {
            BridgeStatus::Paused
        } else {
            BridgeStatus::Active
        }
    }
}

// ============================================================================
// Resource Registry
// ============================================================================

/// Handler variant a resource id is routed to
#[cw_serde]
#[derive(Copy)]
pub enum HandlerKind {
    Fungible,
    NonFungible,
    MultiToken,
    Generic,
    Native,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Fungible => "fungible",
            HandlerKind::NonFungible => "non_fungible",
            HandlerKind::MultiToken => "multi_token",
            HandlerKind::Generic => "generic",
            HandlerKind::Native => "native",
        }
    }
}

/// Routing record for one resource id
#[cw_serde]
pub struct ResourceRecord {
    pub handler: HandlerKind,
    /// cw20/cw721/cw1155 contract address, call target contract for generic
    /// resources, or the bank denom for native resources
    pub token: String,
}

/// Per-token metadata, reset on every registration
#[cw_serde]
pub struct TokenProperties {
    pub resource_id: Binary,
    pub is_whitelisted: bool,
    pub is_burnable: bool,
    /// Unset means amounts pass through unconverted
    pub decimals: Option<u8>,
}

// ============================================================================
// Proposal Execution
// ============================================================================

/// Identity of a proposal dispatched as a sub-message, kept until its
/// outcome is known
#[cw_serde]
pub struct PendingProposal {
    pub origin_domain_id: DomainId,
    pub deposit_nonce: u64,
}

// ============================================================================
// Storage Keys
// ============================================================================

/// Contract name for migration
pub const CONTRACT_NAME: &str = "crates.io:domain-bridge";
/// Contract version for migration
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG: Item<Config> = Item::new("config");

/// Resource id -> routing record
pub const RESOURCES: Map<&[u8], ResourceRecord> = Map::new("resources");

/// Token (address or denom) -> properties
pub const TOKEN_PROPERTIES: Map<&str, TokenProperties> = Map::new("token_properties");

/// (origin domain, nonce / 256) -> 256-bit word of consumed nonces
pub const USED_NONCES: Map<(DomainId, u64), Uint256> = Map::new("used_nonces");

/// Destination domain -> last deposit nonce handed out
pub const DEPOSIT_COUNTS: Map<DomainId, u64> = Map::new("deposit_counts");

/// Admin function name -> account allowed to call it
pub const ACCESS_CONTROL: Map<&str, Addr> = Map::new("access_control");

/// Reply id -> proposal awaiting its sub-message outcome
pub const PENDING_PROPOSALS: Map<u64, PendingProposal> = Map::new("pending_proposals");
