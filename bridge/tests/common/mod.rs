//! Shared cw-multi-test setup for the bridge integration tests.
//!
//! Besides the bridge, the message executor and cw20-base, the suite runs
//! three small in-test contracts: a cw721-shaped NFT, a cw1155-shaped
//! multi-token and a target for generic calls.

#![allow(dead_code)]

use alloy_primitives::B256;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use bridge_common::multi_token::{MultiTokenBalanceResponse, MultiTokenExecuteMsg, MultiTokenQueryMsg};
use bridge_common::nft::{NftExecuteMsg, NftInfoResponse, NftQueryMsg, OwnerOfResponse};
use bridge_common::{Action, Message};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response,
    StdError, StdResult, Uint128, Uint256,
};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use cw_storage_plus::{Item, Map};

use domain_bridge::codec::{
    encode_message, GenericPayload, MessageCall, MultiTokenPayload, NftPayload, TransferPayload,
};
use domain_bridge::msg::{ExecuteMsg, InstantiateMsg, Proposal, Registration};
use domain_bridge::signature::proposals_digest;

pub const DOMAIN_ID: u8 = 1;
pub const OTHER_DOMAIN: u8 = 2;
pub const CHAIN_ID: u64 = 5;
pub const DENOM: &str = "uluna";
pub const GENERIC_GAS_CAP: u64 = 1_000_000;

pub const PRIVATE_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

pub const RES_TOKEN: u8 = 1;
pub const RES_NATIVE: u8 = 2;
pub const RES_NFT: u8 = 3;
pub const RES_MULTI: u8 = 4;
pub const RES_GENERIC: u8 = 5;
pub const RES_MINTABLE: u8 = 6;

pub fn resource(id: u8) -> Binary {
    Binary::from(vec![id; 32])
}

// ============================================================================
// Mock Contracts
// ============================================================================

#[cw_serde]
pub struct MinterMsg {
    pub minter: String,
}

const MINTER: Item<String> = Item::new("minter");
/// (owner, operator)
const OPERATORS: Map<(&str, &str), bool> = Map::new("operators");

fn mock_instantiate(deps: DepsMut, _: Env, _: MessageInfo, msg: MinterMsg) -> StdResult<Response> {
    MINTER.save(deps.storage, &msg.minter)?;
    Ok(Response::new())
}

fn ensure_operator(deps: Deps, owner: &str, sender: &Addr) -> StdResult<()> {
    if owner == sender.as_str() || OPERATORS.has(deps.storage, (owner, sender.as_str())) {
        return Ok(());
    }
    Err(StdError::generic_err("not owner or operator"))
}

fn ensure_minter(deps: Deps, sender: &Addr) -> StdResult<()> {
    if MINTER.load(deps.storage)? != sender.as_str() {
        return Err(StdError::generic_err("not minter"));
    }
    Ok(())
}

// --- cw721-shaped NFT -------------------------------------------------------

const NFT_OWNERS: Map<&str, String> = Map::new("owners");
const NFT_URIS: Map<&str, String> = Map::new("uris");

fn nft_execute(deps: DepsMut, _: Env, info: MessageInfo, msg: NftExecuteMsg) -> StdResult<Response> {
    match msg {
        NftExecuteMsg::TransferNft {
            recipient,
            token_id,
        } => {
            let owner = NFT_OWNERS.load(deps.storage, &token_id)?;
            ensure_operator(deps.as_ref(), &owner, &info.sender)?;
            NFT_OWNERS.save(deps.storage, &token_id, &recipient)?;
        }
        NftExecuteMsg::ApproveAll { operator } => {
            OPERATORS.save(deps.storage, (info.sender.as_str(), operator.as_str()), &true)?;
        }
        NftExecuteMsg::Mint {
            token_id,
            owner,
            token_uri,
        } => {
            ensure_minter(deps.as_ref(), &info.sender)?;
            if NFT_OWNERS.has(deps.storage, &token_id) {
                return Err(StdError::generic_err("token already minted"));
            }
            NFT_OWNERS.save(deps.storage, &token_id, &owner)?;
            if let Some(uri) = token_uri {
                NFT_URIS.save(deps.storage, &token_id, &uri)?;
            }
        }
        NftExecuteMsg::Burn { token_id } => {
            let owner = NFT_OWNERS.load(deps.storage, &token_id)?;
            ensure_operator(deps.as_ref(), &owner, &info.sender)?;
            NFT_OWNERS.remove(deps.storage, &token_id);
            NFT_URIS.remove(deps.storage, &token_id);
        }
    }
    Ok(Response::new())
}

fn nft_query(deps: Deps, _: Env, msg: NftQueryMsg) -> StdResult<Binary> {
    match msg {
        NftQueryMsg::OwnerOf { token_id } => to_json_binary(&OwnerOfResponse {
            owner: NFT_OWNERS.load(deps.storage, &token_id)?,
        }),
        NftQueryMsg::NftInfo { token_id } => to_json_binary(&NftInfoResponse {
            token_uri: NFT_URIS.may_load(deps.storage, &token_id)?,
        }),
    }
}

// --- cw1155-shaped multi-token ---------------------------------------------

/// (owner, token id)
const MT_BALANCES: Map<(&str, &str), Uint128> = Map::new("balances");

fn add_balance(deps: &mut DepsMut, owner: &str, token_id: &str, amount: Uint128) -> StdResult<()> {
    MT_BALANCES.update(deps.storage, (owner, token_id), |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    Ok(())
}

fn sub_balance(deps: &mut DepsMut, owner: &str, token_id: &str, amount: Uint128) -> StdResult<()> {
    MT_BALANCES.update(deps.storage, (owner, token_id), |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_sub(amount)?)
    })?;
    Ok(())
}

fn multi_execute(
    mut deps: DepsMut,
    _: Env,
    info: MessageInfo,
    msg: MultiTokenExecuteMsg,
) -> StdResult<Response> {
    match msg {
        MultiTokenExecuteMsg::BatchSendFrom { from, to, batch, .. } => {
            ensure_operator(deps.as_ref(), &from, &info.sender)?;
            for (token_id, amount) in batch {
                sub_balance(&mut deps, &from, &token_id, amount)?;
                add_balance(&mut deps, &to, &token_id, amount)?;
            }
        }
        MultiTokenExecuteMsg::BatchMint { to, batch, .. } => {
            ensure_minter(deps.as_ref(), &info.sender)?;
            for (token_id, amount) in batch {
                add_balance(&mut deps, &to, &token_id, amount)?;
            }
        }
        MultiTokenExecuteMsg::BatchBurn { from, batch } => {
            ensure_operator(deps.as_ref(), &from, &info.sender)?;
            for (token_id, amount) in batch {
                sub_balance(&mut deps, &from, &token_id, amount)?;
            }
        }
        MultiTokenExecuteMsg::ApproveAll { operator } => {
            OPERATORS.save(deps.storage, (info.sender.as_str(), operator.as_str()), &true)?;
        }
    }
    Ok(Response::new())
}

fn multi_query(deps: Deps, _: Env, msg: MultiTokenQueryMsg) -> StdResult<Binary> {
    match msg {
        MultiTokenQueryMsg::Balance { owner, token_id } => {
            to_json_binary(&MultiTokenBalanceResponse {
                balance: MT_BALANCES
                    .may_load(deps.storage, (owner.as_str(), token_id.as_str()))?
                    .unwrap_or_default(),
            })
        }
    }
}

// --- Generic call target ----------------------------------------------------

#[cw_serde]
pub enum TargetExecuteMsg {
    StoreMessage { depositor: String, data: Binary },
    Reject { depositor: String, data: Binary },
}

#[cw_serde]
pub enum TargetQueryMsg {
    Stored {},
}

#[cw_serde]
pub struct StoredCall {
    pub depositor: String,
    pub data: Binary,
}

const STORED: Item<Vec<StoredCall>> = Item::new("stored");

fn target_instantiate(deps: DepsMut, _: Env, _: MessageInfo, _: Empty) -> StdResult<Response> {
    STORED.save(deps.storage, &vec![])?;
    Ok(Response::new())
}

fn target_execute(deps: DepsMut, _: Env, _: MessageInfo, msg: TargetExecuteMsg) -> StdResult<Response> {
    match msg {
        TargetExecuteMsg::StoreMessage { depositor, data } => {
            STORED.update(deps.storage, |mut calls| -> StdResult<_> {
                calls.push(StoredCall { depositor, data });
                Ok(calls)
            })?;
            Ok(Response::new())
        }
        TargetExecuteMsg::Reject { .. } => Err(StdError::generic_err("rejected")),
    }
}

fn target_query(deps: Deps, _: Env, msg: TargetQueryMsg) -> StdResult<Binary> {
    match msg {
        TargetQueryMsg::Stored {} => to_json_binary(&STORED.load(deps.storage)?),
    }
}

// ============================================================================
// Suite
// ============================================================================

pub struct Suite {
    pub app: App,
    pub admin: Addr,
    pub user: Addr,
    pub relayer: Addr,
    pub fee_recipient: Addr,
    pub bridge: Addr,
    pub executor: Addr,
    /// cw20 with 8 decimals, lock/release
    pub token: Addr,
    /// cw20 minted by the bridge, burn/mint
    pub mintable: Addr,
    pub nft: Addr,
    pub multi: Addr,
    pub target: Addr,
}

fn contract_bridge() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        domain_bridge::contract::execute,
        domain_bridge::contract::instantiate,
        domain_bridge::contract::query,
    )
    .with_reply(domain_bridge::contract::reply);
    Box::new(contract)
}

fn contract_executor() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        message_executor::contract::execute,
        message_executor::contract::instantiate,
        message_executor::contract::query,
    )
    .with_reply(message_executor::contract::reply);
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

fn contract_nft() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(nft_execute, mock_instantiate, nft_query))
}

fn contract_multi() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(multi_execute, mock_instantiate, multi_query))
}

fn contract_target() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(
        target_execute,
        target_instantiate,
        target_query,
    ))
}

fn instantiate_cw20(
    app: &mut App,
    admin: &Addr,
    symbol: &str,
    decimals: u8,
    holder: &Addr,
    minter: Option<&Addr>,
) -> Addr {
    let code_id = app.store_code(contract_cw20());
    app.instantiate_contract(
        code_id,
        admin.clone(),
        &cw20_base::msg::InstantiateMsg {
            name: format!("{} Token", symbol),
            symbol: symbol.to_string(),
            decimals,
            initial_balances: vec![Cw20Coin {
                address: holder.to_string(),
                amount: Uint128::new(1_000_000_000_000),
            }],
            mint: minter.map(|minter| MinterResponse {
                minter: minter.to_string(),
                cap: None,
            }),
            marketing: None,
        },
        &[],
        symbol,
        None,
    )
    .unwrap()
}

pub fn signer() -> PrivateKeySigner {
    PRIVATE_KEY.parse().unwrap()
}

pub fn mpc_address_hex() -> String {
    format!("0x{}", hex::encode(signer().address().as_slice()))
}

pub fn setup() -> Suite {
    setup_with(true)
}

/// Full suite; `keygen` completes key generation so the bridge is active
pub fn setup_with(keygen: bool) -> Suite {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let user = Addr::unchecked("terra1user");
    let relayer = Addr::unchecked("terra1relayer");
    let fee_recipient = Addr::unchecked("terra1fees");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &admin, coins(1_000_000_000_000, DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &user, coins(1_000_000_000_000, DENOM))
            .unwrap();
    });

    let bridge_code = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                domain_id: DOMAIN_ID,
                chain_id: CHAIN_ID,
                fee_recipient: fee_recipient.to_string(),
                generic_gas_cap: GENERIC_GAS_CAP,
            },
            &[],
            "domain-bridge",
            Some(admin.to_string()),
        )
        .unwrap();

    let executor_code = app.store_code(contract_executor());
    let executor = app
        .instantiate_contract(
            executor_code,
            admin.clone(),
            &message_executor::msg::InstantiateMsg {
                admin: admin.to_string(),
                native_denom: DENOM.to_string(),
                recovery_gas: None,
                min_action_gas: None,
                handlers: vec![bridge.to_string()],
            },
            &[],
            "message-executor",
            None,
        )
        .unwrap();

    let token = instantiate_cw20(&mut app, &admin, "TOKEN", 8, &user, None);
    let mintable = instantiate_cw20(&mut app, &admin, "WRAPPED", 18, &user, Some(&bridge));

    let minter = MinterMsg {
        minter: bridge.to_string(),
    };
    let nft_code = app.store_code(contract_nft());
    let nft = app
        .instantiate_contract(nft_code, admin.clone(), &minter, &[], "nft", None)
        .unwrap();
    let multi_code = app.store_code(contract_multi());
    let multi = app
        .instantiate_contract(multi_code, admin.clone(), &minter, &[], "multi", None)
        .unwrap();
    let target_code = app.store_code(contract_target());
    let target = app
        .instantiate_contract(target_code, admin.clone(), &Empty {}, &[], "target", None)
        .unwrap();

    let mut suite = Suite {
        app,
        admin,
        user,
        relayer,
        fee_recipient,
        bridge,
        executor,
        token,
        mintable,
        nft,
        multi,
        target,
    };

    let registrations = [
        (RES_TOKEN, suite.token.to_string(), Registration::Fungible { decimals: Some(8) }),
        (RES_NATIVE, DENOM.to_string(), Registration::Native { decimals: Some(6) }),
        (RES_NFT, suite.nft.to_string(), Registration::NonFungible {}),
        (RES_MULTI, suite.multi.to_string(), Registration::MultiToken {}),
        (RES_GENERIC, suite.target.to_string(), Registration::Generic {}),
        (RES_MINTABLE, suite.mintable.to_string(), Registration::Fungible { decimals: None }),
    ];
    for (id, token, registration) in registrations {
        suite
            .admin_execute(&ExecuteMsg::AdminSetResource {
                resource_id: resource(id),
                token,
                registration,
            })
            .unwrap();
    }
    suite
        .admin_execute(&ExecuteMsg::AdminSetBurnable {
            token: suite.mintable.to_string(),
        })
        .unwrap();

    if keygen {
        suite
            .admin_execute(&ExecuteMsg::EndKeygen {
                mpc_address: mpc_address_hex(),
            })
            .unwrap();
    }

    suite
}

impl Suite {
    pub fn admin_execute(&mut self, msg: &ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(self.admin.clone(), self.bridge.clone(), msg, &[])
    }

    pub fn deposit(
        &mut self,
        resource_id: u8,
        deposit_data: Binary,
        funds: &[cosmwasm_std::Coin],
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.user.clone(),
            self.bridge.clone(),
            &ExecuteMsg::Deposit {
                destination_domain_id: OTHER_DOMAIN,
                resource_id: resource(resource_id),
                deposit_data,
                fee_data: Binary::default(),
            },
            funds,
        )
    }

    /// Let the bridge pull `amount` of a cw20 from the user
    pub fn approve_cw20(&mut self, token: &Addr, amount: u128) {
        self.app
            .execute_contract(
                self.user.clone(),
                token.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: self.bridge.to_string(),
                    amount: Uint128::new(amount),
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    /// Give the bridge custody of `amount` of a cw20 without a deposit
    pub fn fund_bridge_cw20(&mut self, token: &Addr, amount: u128) {
        self.app
            .execute_contract(
                self.user.clone(),
                token.clone(),
                &Cw20ExecuteMsg::Transfer {
                    recipient: self.bridge.to_string(),
                    amount: Uint128::new(amount),
                },
                &[],
            )
            .unwrap();
    }

    pub fn execute_proposals(&mut self, proposals: Vec<Proposal>) -> anyhow::Result<AppResponse> {
        let signature = sign(self.bridge.as_str(), CHAIN_ID, &proposals);
        self.execute_signed(proposals, signature)
    }

    pub fn execute_signed(
        &mut self,
        proposals: Vec<Proposal>,
        signature: Binary,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.relayer.clone(),
            self.bridge.clone(),
            &ExecuteMsg::ExecuteProposals {
                proposals,
                signature,
            },
            &[],
        )
    }

    pub fn cw20_balance(&self, token: &Addr, owner: &Addr) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: owner.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    pub fn native_balance(&self, owner: &Addr) -> Uint128 {
        self.app.wrap().query_balance(owner, DENOM).unwrap().amount
    }

    pub fn nft_owner(&self, token_id: &str) -> Option<String> {
        self.app
            .wrap()
            .query_wasm_smart::<OwnerOfResponse>(
                &self.nft,
                &NftQueryMsg::OwnerOf {
                    token_id: token_id.to_string(),
                },
            )
            .ok()
            .map(|res| res.owner)
    }

    pub fn multi_balance(&self, owner: &Addr, token_id: &str) -> Uint128 {
        let res: MultiTokenBalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.multi,
                &MultiTokenQueryMsg::Balance {
                    owner: owner.to_string(),
                    token_id: token_id.to_string(),
                },
            )
            .unwrap();
        res.balance
    }
}

// ============================================================================
// Signing & Payloads
// ============================================================================

pub fn sign(bridge: &str, chain_id: u64, proposals: &[Proposal]) -> Binary {
    let digest = proposals_digest(chain_id, bridge, proposals).unwrap();
    let signature = signer().sign_hash_sync(&B256::from(digest)).unwrap();
    Binary::from(signature.as_bytes().to_vec())
}

pub fn proposal(nonce: u64, resource_id: u8, data: Binary) -> Proposal {
    Proposal {
        origin_domain_id: OTHER_DOMAIN,
        deposit_nonce: nonce,
        resource_id: resource(resource_id),
        data,
    }
}

pub fn transfer_payload(amount: u128, recipient: &Addr) -> Binary {
    Binary::from(
        TransferPayload {
            amount: Uint256::from(amount),
            recipient: recipient.as_bytes().to_vec(),
            message: None,
        }
        .encode(),
    )
}

pub fn transfer_with_message(amount: u128, executor: &Addr, gas: u64, message: &Message) -> Binary {
    Binary::from(
        TransferPayload {
            amount: Uint256::from(amount),
            recipient: executor.as_bytes().to_vec(),
            message: Some(MessageCall {
                gas,
                message: encode_message(message).unwrap(),
            }),
        }
        .encode(),
    )
}

pub fn nft_payload(token_id: u64, recipient: &Addr, metadata: &str) -> Binary {
    Binary::from(
        NftPayload {
            token_id: Uint256::from(token_id),
            recipient: recipient.as_bytes().to_vec(),
            metadata: metadata.as_bytes().to_vec(),
        }
        .encode(),
    )
}

pub fn multi_payload(ids: &[u64], amounts: &[u128], recipient: &Addr) -> Binary {
    Binary::from(
        MultiTokenPayload {
            token_ids: ids.iter().map(|id| Uint256::from(*id)).collect(),
            amounts: amounts.iter().map(|a| Uint256::from(*a)).collect(),
            recipient: recipient.as_bytes().to_vec(),
            transfer_data: vec![],
        }
        .encode(),
    )
}

pub fn generic_payload(
    max_fee: u64,
    function: &str,
    target: &Addr,
    depositor: &Addr,
    data: &[u8],
) -> Binary {
    Binary::from(
        GenericPayload {
            max_fee: Uint256::from(max_fee),
            function: function.as_bytes().to_vec(),
            target: target.as_bytes().to_vec(),
            depositor: depositor.as_bytes().to_vec(),
            execution_data: data.to_vec(),
        }
        .encode()
        .unwrap(),
    )
}

pub fn plain_action(call_to: &Addr, data: Binary) -> Action {
    Action {
        native_value: Uint128::zero(),
        call_to: call_to.to_string(),
        approve_to: String::new(),
        token_send: String::new(),
        token_receive: String::new(),
        data,
    }
}

// ============================================================================
// Events
// ============================================================================

pub fn has_event(res: &AppResponse, ty: &str) -> bool {
    res.events.iter().any(|e| e.ty == format!("wasm-{}", ty))
}

pub fn event_count(res: &AppResponse, ty: &str) -> usize {
    res.events
        .iter()
        .filter(|e| e.ty == format!("wasm-{}", ty))
        .count()
}

pub fn event_attr(res: &AppResponse, ty: &str, key: &str) -> Option<String> {
    res.events
        .iter()
        .filter(|e| e.ty == format!("wasm-{}", ty))
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}

pub fn error_text(err: anyhow::Error) -> String {
    err.root_cause().to_string()
}
