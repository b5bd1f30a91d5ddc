//! Domain Bridge Contract - Cross-Domain Asset Bridging
//!
//! Moves fungible, non-fungible, multi-token and native assets, and arbitrary
//! contract calls, between domains of a bridge network.
//!
//! # Outgoing Flow (Deposit)
//! 1. User calls `Deposit` for a registered resource id
//! 2. The resource's handler locks (or burns) the asset and normalizes amounts
//! 3. A `deposit` event with a per-destination nonce is emitted for relayers
//!
//! # Incoming Flow (Proposals)
//! 1. Relayers collect deposits from other domains into proposals
//! 2. The MPC key signs the batch; anyone submits it with `ExecuteProposals`
//! 3. Each unused nonce is consumed and its handler releases (or mints) the
//!    asset, optionally routing it through the message executor
//!
//! # Security
//! - One MPC signature per batch, bound to chain id and bridge address
//! - Nonce bitmap per origin domain against replays
//! - Per-proposal failure isolation; a failed proposal leaves its nonce unused
//! - Capability-based access control for administrative functions
//! - Emergency pause

pub mod abi;
pub mod access;
pub mod codec;
pub mod contract;
pub mod decimals;
pub mod error;
mod execute;
pub mod fee_manager;
pub mod handler;
pub mod hash;
pub mod msg;
pub mod nonce;
mod query;
pub mod resource;
pub mod signature;
pub mod state;

pub use crate::error::ContractError;
pub use crate::fee_manager::{calculate_fee, FeeStrategy};
pub use crate::hash::keccak256;
pub use crate::signature::proposals_digest;
