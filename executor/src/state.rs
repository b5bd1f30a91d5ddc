use bridge_common::{Action, AssetInfo};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:message-executor";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gas kept back for the final balance transfer
pub const DEFAULT_RECOVERY_GAS: u64 = 100_000;
/// Smallest stipend an action may be given
pub const DEFAULT_MIN_ACTION_GAS: u64 = 50_000;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Bank denom forwarded as `native_value`
    pub native_denom: String,
    pub recovery_gas: u64,
    pub min_action_gas: u64,
}

/// An asset whose balance is watched for the duration of one message
#[cw_serde]
pub struct TrackedAsset {
    pub info: AssetInfo,
    /// Balance not owned by the message
    pub baseline: Uint128,
}

/// The bridged message currently executing
#[cw_serde]
pub struct Execution {
    pub transaction_id: Binary,
    pub asset: AssetInfo,
    pub amount: Uint128,
    pub recipient: Addr,
    pub actions: Vec<Action>,
    pub tracked: Vec<TrackedAsset>,
    pub failed_actions: u32,
}

impl Execution {
    pub fn baseline(&self, info: &AssetInfo) -> Option<Uint128> {
        self.tracked
            .iter()
            .find(|tracked| &tracked.info == info)
            .map(|tracked| tracked.baseline)
    }
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Contracts allowed to call `HandleBridgeMessage`
pub const HANDLER_ROLES: Map<&Addr, bool> = Map::new("handler_roles");

pub const EXECUTION: Item<Execution> = Item::new("execution");
