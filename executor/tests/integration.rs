//! Integration tests for the message executor using cw-multi-test.
//!
//! A plain account plays the bridge handler: it credits the executor with
//! tokens and then submits `HandleBridgeMessage`.

use bridge_common::{Action, AssetInfo, Message};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_json_binary, wasm_execute, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo,
    Response, StdError, StdResult, Uint128,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use message_executor::msg::{ExecuteMsg, InstantiateMsg};

const DENOM: &str = "uluna";

// ============================================================================
// Mock swap venue
// ============================================================================

#[cw_serde]
enum SwapMsg {
    /// Pull `amount_in` of `token_in` from the caller's allowance and pay out
    /// `amount_out` of `token_out`
    Swap {
        token_in: String,
        amount_in: Uint128,
        token_out: String,
        amount_out: Uint128,
    },
    Fail {},
}

fn swap_instantiate(_: DepsMut, _: Env, _: MessageInfo, _: Empty) -> StdResult<Response> {
    Ok(Response::new())
}

fn swap_execute(_: DepsMut, env: Env, info: MessageInfo, msg: SwapMsg) -> StdResult<Response> {
    match msg {
        SwapMsg::Swap {
            token_in,
            amount_in,
            token_out,
            amount_out,
        } => Ok(Response::new()
            .add_message(wasm_execute(
                token_in,
                &Cw20ExecuteMsg::TransferFrom {
                    owner: info.sender.to_string(),
                    recipient: env.contract.address.to_string(),
                    amount: amount_in,
                },
                vec![],
            )?)
            .add_message(wasm_execute(
                token_out,
                &Cw20ExecuteMsg::Transfer {
                    recipient: info.sender.to_string(),
                    amount: amount_out,
                },
                vec![],
            )?)),
        SwapMsg::Fail {} => Err(StdError::generic_err("swap failed")),
    }
}

fn swap_query(_: Deps, _: Env, _: Empty) -> StdResult<Binary> {
    to_json_binary(&Empty {})
}

// ============================================================================
// Test Setup
// ============================================================================

struct Suite {
    app: App,
    admin: Addr,
    bridge: Addr,
    recipient: Addr,
    executor: Addr,
    swap: Addr,
    token_in: Addr,
    token_out: Addr,
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

fn contract_swap() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(swap_execute, swap_instantiate, swap_query))
}

fn instantiate_token(app: &mut App, admin: &Addr, symbol: &str, holder: &Addr) -> Addr {
    let code_id = app.store_code(contract_cw20());
    app.instantiate_contract(
        code_id,
        admin.clone(),
        &cw20_base::msg::InstantiateMsg {
            name: format!("{} Token", symbol),
            symbol: symbol.to_string(),
            decimals: 6,
            initial_balances: vec![Cw20Coin {
                address: holder.to_string(),
                amount: Uint128::new(1_000_000),
            }],
            mint: None,
            marketing: None,
        },
        &[],
        symbol,
        None,
    )
    .unwrap()
}

fn setup() -> Suite {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let bridge = Addr::unchecked("terra1bridge");
    let recipient = Addr::unchecked("terra1recipient");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &bridge, coins(10_000_000, DENOM))
            .unwrap();
    });

    let code_id = app.store_code(contract_executor());
    let executor = app
        .instantiate_contract(
            code_id,
            admin.clone(),
            &InstantiateMsg {
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

    let swap_code = app.store_code(contract_swap());
    let swap = app
        .instantiate_contract(swap_code, admin.clone(), &Empty {}, &[], "swap", None)
        .unwrap();

    let token_in = instantiate_token(&mut app, &admin, "TIN", &bridge);
    let token_out = instantiate_token(&mut app, &admin, "TOUT", &swap);

    Suite {
        app,
        admin,
        bridge,
        recipient,
        executor,
        swap,
        token_in,
        token_out,
    }
}

fn cw20_balance(app: &App, token: &Addr, owner: &Addr) -> Uint128 {
    let res: BalanceResponse = app
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

fn swap_allowance(suite: &Suite) -> Uint128 {
    let res: AllowanceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.token_in,
            &Cw20QueryMsg::Allowance {
                owner: suite.executor.to_string(),
                spender: suite.swap.to_string(),
            },
        )
        .unwrap();
    res.allowance
}

fn has_event(res: &AppResponse, ty: &str) -> bool {
    res.events.iter().any(|e| e.ty == format!("wasm-{}", ty))
}

fn event_attr(res: &AppResponse, ty: &str, key: &str) -> Option<String> {
    res.events
        .iter()
        .filter(|e| e.ty == format!("wasm-{}", ty))
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}

fn action(call_to: &Addr, data: Binary) -> Action {
    Action {
        native_value: Uint128::zero(),
        call_to: call_to.to_string(),
        approve_to: String::new(),
        token_send: String::new(),
        token_receive: String::new(),
        data,
    }
}

fn message(suite: &Suite, actions: Vec<Action>) -> Message {
    Message {
        transaction_id: Binary::from(vec![7u8; 32]),
        actions,
        recipient: suite.recipient.to_string(),
    }
}

/// Credit `amount` of the input token to the executor, then hand it the message
fn credit_and_handle(
    suite: &mut Suite,
    amount: u128,
    message: Message,
    gas_limit: u64,
) -> anyhow::Result<AppResponse> {
    suite
        .app
        .execute_contract(
            suite.bridge.clone(),
            suite.token_in.clone(),
            &Cw20ExecuteMsg::Transfer {
                recipient: suite.executor.to_string(),
                amount: Uint128::new(amount),
            },
            &[],
        )
        .unwrap();

    suite.app.execute_contract(
        suite.bridge.clone(),
        suite.executor.clone(),
        &ExecuteMsg::HandleBridgeMessage {
            asset: AssetInfo::cw20(suite.token_in.clone()),
            amount: Uint128::new(amount),
            message,
            gas_limit,
        },
        &[],
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_requires_handler_role() {
    let mut suite = setup();
    let msg = message(&suite, vec![]);

    let err = suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.executor.clone(),
            &ExecuteMsg::HandleBridgeMessage {
                asset: AssetInfo::native(DENOM),
                amount: Uint128::zero(),
                message: msg,
                gas_limit: 1_000_000,
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("InsufficientPermission"));
}

#[test]
fn test_gas_limit_must_cover_every_action() {
    let mut suite = setup();
    let fail = to_json_binary(&SwapMsg::Fail {}).unwrap();
    let actions = vec![action(&suite.swap, fail.clone()), action(&suite.swap, fail)];
    let msg = message(&suite, actions);

    // recovery 100k + 2 x 50k
    let err = credit_and_handle(&mut suite, 100, msg, 199_999).unwrap_err();
    assert!(err.root_cause().to_string().contains("InsufficientGasLimit"));
}

#[test]
fn test_all_actions_revert_recovers_full_amount() {
    let mut suite = setup();
    let fail = to_json_binary(&SwapMsg::Fail {}).unwrap();
    let actions = vec![action(&suite.swap, fail.clone()), action(&suite.swap, fail)];
    let msg = message(&suite, actions);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();

    let reverted = res
        .events
        .iter()
        .filter(|e| e.ty == "wasm-action_reverted")
        .count();
    assert_eq!(reverted, 2);
    assert!(!has_event(&res, "executed"));
    assert_eq!(
        event_attr(&res, "transfer_recovered", "returned").as_deref(),
        Some("100")
    );
    assert_eq!(
        event_attr(&res, "transfer_recovered", "transferred_by_actions").as_deref(),
        Some("0")
    );
    assert_eq!(
        event_attr(&res, "transfer_recovered", "failed_actions").as_deref(),
        Some("2")
    );

    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.recipient),
        Uint128::new(100)
    );
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.executor),
        Uint128::zero()
    );
}

#[test]
fn test_swap_action_executes_and_clears_allowance() {
    let mut suite = setup();
    let swap = to_json_binary(&SwapMsg::Swap {
        token_in: suite.token_in.to_string(),
        amount_in: Uint128::new(60),
        token_out: suite.token_out.to_string(),
        amount_out: Uint128::new(150),
    })
    .unwrap();
    let mut swap_action = action(&suite.swap, swap);
    swap_action.approve_to = suite.swap.to_string();
    swap_action.token_send = suite.token_in.to_string();
    swap_action.token_receive = suite.token_out.to_string();
    let msg = message(&suite, vec![swap_action]);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();
    assert!(has_event(&res, "executed"));
    assert!(!has_event(&res, "transfer_recovered"));

    // The unspent 40 and the swap output both reach the recipient
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.recipient),
        Uint128::new(40)
    );
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_out, &suite.recipient),
        Uint128::new(150)
    );
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.swap),
        Uint128::new(60)
    );

    assert_eq!(swap_allowance(&suite), Uint128::zero());
}

#[test]
fn test_failed_approved_action_clears_allowance() {
    let mut suite = setup();
    let fail = to_json_binary(&SwapMsg::Fail {}).unwrap();
    let mut swap_action = action(&suite.swap, fail);
    swap_action.approve_to = suite.swap.to_string();
    swap_action.token_send = suite.token_in.to_string();
    let msg = message(&suite, vec![swap_action]);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();
    assert!(has_event(&res, "action_reverted"));
    assert_eq!(
        event_attr(&res, "transfer_recovered", "returned").as_deref(),
        Some("100")
    );
    assert_eq!(swap_allowance(&suite), Uint128::zero());
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.recipient),
        Uint128::new(100)
    );
}

#[test]
fn test_standing_allowance_survives_approved_action() {
    let mut suite = setup();
    let grant = to_json_binary(&Cw20ExecuteMsg::IncreaseAllowance {
        spender: suite.swap.to_string(),
        amount: Uint128::new(5),
        expires: None,
    })
    .unwrap();
    let swap = to_json_binary(&SwapMsg::Swap {
        token_in: suite.token_in.to_string(),
        amount_in: Uint128::new(60),
        token_out: suite.token_out.to_string(),
        amount_out: Uint128::new(150),
    })
    .unwrap();
    let mut swap_action = action(&suite.swap, swap);
    swap_action.approve_to = suite.swap.to_string();
    swap_action.token_send = suite.token_in.to_string();
    swap_action.token_receive = suite.token_out.to_string();
    let msg = message(&suite, vec![action(&suite.token_in, grant), swap_action]);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();
    assert!(has_event(&res, "executed"));

    // Only the part granted for the swap is revoked
    assert_eq!(swap_allowance(&suite), Uint128::new(5));
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.recipient),
        Uint128::new(40)
    );
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_out, &suite.recipient),
        Uint128::new(150)
    );
}

#[test]
fn test_failed_action_does_not_block_the_next() {
    let mut suite = setup();
    let fail = to_json_binary(&SwapMsg::Fail {}).unwrap();
    let swap = to_json_binary(&SwapMsg::Swap {
        token_in: suite.token_in.to_string(),
        amount_in: Uint128::new(100),
        token_out: suite.token_out.to_string(),
        amount_out: Uint128::new(300),
    })
    .unwrap();
    let mut swap_action = action(&suite.swap, swap);
    swap_action.approve_to = suite.swap.to_string();
    swap_action.token_send = suite.token_in.to_string();
    swap_action.token_receive = suite.token_out.to_string();
    let msg = message(&suite, vec![action(&suite.swap, fail), swap_action]);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();
    assert_eq!(
        event_attr(&res, "action_reverted", "index").as_deref(),
        Some("0")
    );
    assert_eq!(
        event_attr(&res, "transfer_recovered", "transferred_by_actions").as_deref(),
        Some("100")
    );
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_out, &suite.recipient),
        Uint128::new(300)
    );
}

#[test]
fn test_call_data_to_plain_account_reverts() {
    let mut suite = setup();
    let someone = Addr::unchecked("terra1someone");
    let msg = message(&suite, vec![action(&someone, Binary::from(b"{}".to_vec()))]);

    let res = credit_and_handle(&mut suite, 100, msg, 1_000_000).unwrap();
    assert!(has_event(&res, "action_reverted"));
    assert!(has_event(&res, "transfer_recovered"));
    assert_eq!(
        cw20_balance(&suite.app, &suite.token_in, &suite.recipient),
        Uint128::new(100)
    );
}

#[test]
fn test_native_value_limited_to_message_funds() {
    let mut suite = setup();
    let merchant = Addr::unchecked("terra1merchant");

    // Coins the executor already held are not the message's to spend
    suite
        .app
        .send_tokens(
            suite.bridge.clone(),
            suite.executor.clone(),
            &coins(1_000, DENOM),
        )
        .unwrap();

    let mut pay = action(&merchant, Binary::default());
    pay.native_value = Uint128::new(200);
    let mut overspend = action(&merchant, Binary::default());
    overspend.native_value = Uint128::new(400);
    let msg = message(&suite, vec![pay, overspend]);

    let res = suite
        .app
        .execute_contract(
            suite.bridge.clone(),
            suite.executor.clone(),
            &ExecuteMsg::HandleBridgeMessage {
                asset: AssetInfo::native(DENOM),
                amount: Uint128::new(500),
                message: msg,
                gas_limit: 1_000_000,
            },
            &coins(500, DENOM),
        )
        .unwrap();

    assert_eq!(
        event_attr(&res, "action_reverted", "index").as_deref(),
        Some("1")
    );

    let balance = |addr: &Addr| suite.app.wrap().query_balance(addr, DENOM).unwrap().amount;
    assert_eq!(balance(&merchant), Uint128::new(200));
    assert_eq!(balance(&suite.recipient), Uint128::new(300));
    assert_eq!(balance(&suite.executor), Uint128::new(1_000));
}

#[test]
fn test_self_only_entry_points() {
    let mut suite = setup();
    let err = suite
        .app
        .execute_contract(
            suite.bridge.clone(),
            suite.executor.clone(),
            &ExecuteMsg::ReleaseAllowance {
                token: suite.token_in.to_string(),
                spender: suite.swap.to_string(),
                restore_to: Uint128::zero(),
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("OnlyExecutor"));
}
