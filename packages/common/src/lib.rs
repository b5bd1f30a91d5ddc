//! Bridge Common - Shared Types for the Domain Bridge Contracts
//!
//! This package provides the types that cross contract boundaries: asset
//! descriptors, the generic message format carried by bridged deposits, the
//! message executor's entry message, and the execute/query shapes of the
//! non-fungible and multi-token contracts the bridge handlers talk to.

pub mod asset;
pub mod executor;
pub mod message;
pub mod multi_token;
pub mod nft;

pub use asset::AssetInfo;
pub use message::{Action, Message};
