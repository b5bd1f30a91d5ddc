//! Message types for the domain bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::fee_manager::{FeeQuote, FeeStrategy};
use crate::state::{BridgeStatus, DomainId, HandlerKind, TokenProperties};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Account granted every access-controlled function
    pub admin: String,
    /// Domain id of this chain within the bridge network
    pub domain_id: DomainId,
    /// Numeric chain id bound into proposal signatures
    pub chain_id: u64,
    /// Receiver of deposit fees
    pub fee_recipient: String,
    /// Largest gas amount a generic deposit may request
    pub generic_gas_cap: u64,
}

// ============================================================================
// Shared Types
// ============================================================================

/// A signed instruction to complete a deposit made on another domain
#[cw_serde]
pub struct Proposal {
    pub origin_domain_id: DomainId,
    pub deposit_nonce: u64,
    /// 32-byte resource id
    pub resource_id: Binary,
    /// Handler-specific payload
    pub data: Binary,
}

/// Handler kind plus its kind-specific registration parameters
#[cw_serde]
pub enum Registration {
    Fungible { decimals: Option<u8> },
    NonFungible {},
    MultiToken {},
    Generic {},
    Native { decimals: Option<u8> },
}

impl Registration {
    pub fn handler(&self) -> HandlerKind {
        match self {
            Registration::Fungible { .. } => HandlerKind::Fungible,
            Registration::NonFungible {} => HandlerKind::NonFungible,
            Registration::MultiToken {} => HandlerKind::MultiToken,
            Registration::Generic {} => HandlerKind::Generic,
            Registration::Native { .. } => HandlerKind::Native,
        }
    }

    pub fn decimals(&self) -> Option<u8> {
        match self {
            Registration::Fungible { decimals } | Registration::Native { decimals } => *decimals,
            _ => None,
        }
    }
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Deposits
    // ========================================================================
    /// Lock or burn an asset for redemption on another domain
    ///
    /// Authorization: Anyone
    ///
    /// Native resources and flat fees are paid with attached coins; cw20,
    /// cw721 and cw1155 resources need a prior allowance or operator grant.
    Deposit {
        destination_domain_id: DomainId,
        resource_id: Binary,
        deposit_data: Binary,
        /// Opaque input to the fee strategy, echoed in the deposit event
        fee_data: Binary,
    },

    /// Ask relayers to re-observe a deposit transaction
    ///
    /// Authorization: Anyone (advisory event only)
    Retry { deposit_tx_hash: String },

    // ========================================================================
    // Proposal Execution
    // ========================================================================
    /// Execute one signed proposal
    ///
    /// Authorization: Anyone holding a valid MPC signature
    ExecuteProposal {
        proposal: Proposal,
        /// 65-byte `r | s | v` signature over the proposal batch digest
        signature: Binary,
    },

    /// Execute a batch of proposals covered by one signature
    ///
    /// Authorization: Anyone holding a valid MPC signature
    ///
    /// A failing proposal is reported and leaves its nonce unused; the rest of
    /// the batch still executes.
    ExecuteProposals {
        proposals: Vec<Proposal>,
        signature: Binary,
    },

    /// Run a single proposal's handler in its own sub-message
    ///
    /// Authorization: The bridge itself
    ProcessProposal { proposal: Proposal, reply_id: u64 },

    // ========================================================================
    // Administration
    // ========================================================================
    /// Route a resource id to a handler and token, resetting its properties
    ///
    /// Authorization: `admin_set_resource`
    AdminSetResource {
        resource_id: Binary,
        token: String,
        registration: Registration,
    },

    /// Switch a registered token to burn/mint mode
    ///
    /// Authorization: `admin_set_burnable`
    AdminSetBurnable { token: String },

    /// Raise the deposit counter towards a domain
    ///
    /// Authorization: `admin_set_deposit_nonce`
    AdminSetDepositNonce { domain_id: DomainId, nonce: u64 },

    /// Authorization: `admin_pause_transfers`
    AdminPauseTransfers {},

    /// Requires a completed key generation
    ///
    /// Authorization: `admin_unpause_transfers`
    AdminUnpauseTransfers {},

    /// Move assets held by the bridge out of its custody
    ///
    /// Authorization: `admin_withdraw`
    AdminWithdraw {
        resource_id: Binary,
        recipient: String,
        /// Fungible/native/multi-token amount; ignored for non-fungible
        amount: Uint128,
        /// Required for non-fungible and multi-token resources
        token_id: Option<String>,
    },

    /// Set (or clear with `None`) the fee strategy of a route
    ///
    /// Authorization: `admin_set_fee`
    AdminSetFee {
        destination_domain_id: DomainId,
        resource_id: Binary,
        strategy: Option<FeeStrategy>,
    },

    /// Authorization: `admin_set_fee_recipient`
    AdminSetFeeRecipient { fee_recipient: String },

    /// Signal relayers to run key generation
    ///
    /// Authorization: `start_keygen`
    StartKeygen {},

    /// Record the MPC address produced by key generation (once)
    ///
    /// Authorization: `end_keygen`
    EndKeygen {
        /// 20-byte hex address, `0x` prefix optional
        mpc_address: String,
    },

    /// Signal relayers to refresh key shares; the address stays unchanged
    ///
    /// Authorization: `refresh_key`
    RefreshKey { hash: String },

    /// Hand an access-controlled function to another account
    ///
    /// Authorization: `grant_access`
    GrantAccess { function: String, account: String },
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(StatusResponse)]
    Status {},

    /// Whether the nonce of a deposit from `domain_id` has been consumed
    #[returns(IsProposalExecutedResponse)]
    IsProposalExecuted { domain_id: DomainId, deposit_nonce: u64 },

    /// Last deposit nonce handed out towards `domain_id`
    #[returns(DepositCountResponse)]
    DepositCount { domain_id: DomainId },

    #[returns(ResourceResponse)]
    Resource { resource_id: Binary },

    #[returns(ResourcesResponse)]
    Resources {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(TokenPropertiesResponse)]
    TokenProperties { token: String },

    #[returns(AccessHolderResponse)]
    AccessHolder { function: String },

    /// Quote the fee of a deposit without executing it
    #[returns(FeeQuoteResponse)]
    CalculateFee {
        destination_domain_id: DomainId,
        resource_id: Binary,
        deposit_data: Binary,
    },

    /// Digest the MPC signer must sign for a proposal batch
    #[returns(ProposalsDigestResponse)]
    ProposalsDigest { proposals: Vec<Proposal> },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub domain_id: DomainId,
    pub chain_id: u64,
    pub paused: bool,
    /// `0x`-prefixed hex, once key generation completed
    pub mpc_address: Option<String>,
    pub fee_recipient: Addr,
    pub generic_gas_cap: u64,
}

#[cw_serde]
pub struct StatusResponse {
    pub status: BridgeStatus,
}

#[cw_serde]
pub struct IsProposalExecutedResponse {
    pub executed: bool,
}

#[cw_serde]
pub struct DepositCountResponse {
    pub domain_id: DomainId,
    pub count: u64,
}

#[cw_serde]
pub struct ResourceResponse {
    pub resource_id: Binary,
    pub handler: HandlerKind,
    pub token: String,
    pub properties: Option<TokenProperties>,
}

#[cw_serde]
pub struct ResourcesResponse {
    pub resources: Vec<ResourceResponse>,
}

#[cw_serde]
pub struct TokenPropertiesResponse {
    pub token: String,
    pub properties: TokenProperties,
}

#[cw_serde]
pub struct AccessHolderResponse {
    pub function: String,
    pub account: Option<Addr>,
}

#[cw_serde]
pub struct FeeQuoteResponse {
    pub fee: Option<FeeQuote>,
}

#[cw_serde]
pub struct ProposalsDigestResponse {
    pub digest: Binary,
}
