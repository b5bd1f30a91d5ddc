//! Message shapes of the multi-token contracts (cw1155 layout).

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint128};

pub type TokenId = String;

#[cw_serde]
pub enum MultiTokenExecuteMsg {
    BatchSendFrom {
        from: String,
        to: String,
        batch: Vec<(TokenId, Uint128)>,
        msg: Option<Binary>,
    },
    BatchMint {
        to: String,
        batch: Vec<(TokenId, Uint128)>,
        msg: Option<Binary>,
    },
    BatchBurn {
        from: String,
        batch: Vec<(TokenId, Uint128)>,
    },
    ApproveAll {
        operator: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum MultiTokenQueryMsg {
    /// Also used by the bridge as the standard's introspection probe
    #[returns(MultiTokenBalanceResponse)]
    Balance { owner: String, token_id: TokenId },
}

#[cw_serde]
pub struct MultiTokenBalanceResponse {
    pub balance: Uint128,
}
