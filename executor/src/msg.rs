use bridge_common::{AssetInfo, Message};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin who can manage handler roles and gas settings
    pub admin: String,
    /// Bank denom actions may forward as `native_value`
    pub native_denom: String,
    pub recovery_gas: Option<u64>,
    pub min_action_gas: Option<u64>,
    /// Accounts granted the handler role up front
    pub handlers: Vec<String>,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Run a bridged message; `amount` of `asset` was credited just before the call.
    /// Handler role only.
    HandleBridgeMessage {
        asset: AssetInfo,
        amount: Uint128,
        message: Message,
        gas_limit: u64,
    },
    /// Executor only: run one action of the current message
    PerformAction { index: u32 },
    /// Executor only: bring an action's allowance back down to `restore_to`,
    /// the amount the spender held before the action was approved
    ReleaseAllowance {
        token: String,
        spender: String,
        restore_to: Uint128,
    },
    /// Executor only: hand every surplus balance to the message recipient
    TransferBalance {},
    /// Admin: allow `account` to submit bridged messages
    GrantHandlerRole { account: String },
    /// Admin: revoke the handler role
    RevokeHandlerRole { account: String },
    /// Admin: tune the gas model
    UpdateConfig {
        recovery_gas: Option<u64>,
        min_action_gas: Option<u64>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(HasHandlerRoleResponse)]
    HasHandlerRole { account: String },
    /// Paginated list of handler role holders
    #[returns(HandlerRolesResponse)]
    HandlerRoles {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub native_denom: String,
    pub recovery_gas: u64,
    pub min_action_gas: u64,
}

#[cw_serde]
pub struct HasHandlerRoleResponse {
    pub has_role: bool,
}

#[cw_serde]
pub struct HandlerRolesResponse {
    pub handlers: Vec<Addr>,
}
