//! Message shapes of the non-fungible token contracts (cw721 layout).

use cosmwasm_schema::{cw_serde, QueryResponses};

#[cw_serde]
pub enum NftExecuteMsg {
    TransferNft {
        recipient: String,
        token_id: String,
    },
    ApproveAll {
        operator: String,
    },
    Mint {
        token_id: String,
        owner: String,
        token_uri: Option<String>,
    },
    Burn {
        token_id: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum NftQueryMsg {
    #[returns(OwnerOfResponse)]
    OwnerOf { token_id: String },
    #[returns(NftInfoResponse)]
    NftInfo { token_id: String },
}

#[cw_serde]
pub struct OwnerOfResponse {
    pub owner: String,
}

#[cw_serde]
pub struct NftInfoResponse {
    pub token_uri: Option<String>,
}
