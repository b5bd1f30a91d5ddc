//! Entry message of the message executor, as sent by the bridge handlers.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Coin, CosmosMsg, StdResult, Uint128, WasmMsg};

use crate::asset::AssetInfo;
use crate::message::Message;

/// The subset of the executor's execute messages callable by a bridge handler
#[cw_serde]
pub enum ExecutorMsg {
    /// Execute a bridged message. `asset`/`amount` describe the funds that
    /// were credited to the executor for this message just before the call.
    HandleBridgeMessage {
        asset: AssetInfo,
        amount: Uint128,
        message: Message,
        gas_limit: u64,
    },
}

impl ExecutorMsg {
    pub fn into_cosmos_msg(self, executor: &str, funds: Vec<Coin>) -> StdResult<CosmosMsg> {
        Ok(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: executor.to_string(),
            msg: to_json_binary(&self)?,
            funds,
        }))
    }
}
