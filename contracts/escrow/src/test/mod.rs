pub mod deposit_test;

use crate::{CheckoutEscrow, CheckoutEscrowClient};
use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

pub const FEE_BPS: u32 = 100;
pub const ESCROW_TIMEOUT: u64 = 3600;
pub const MULTISIG_THRESHOLD: i128 = 1_000_000_000;
pub const SLIPPAGE_BPS: u32 = 50;

// ============================================================================
// MOCK EXCHANGE
// ============================================================================

#[contracttype]
#[derive(Clone)]
pub enum MockExchangeKey {
    ReserveIn,
    ReserveOut,
    ExecutionOverride,
}

/// Constant-product exchange double. Quotes from fixed reserves;
/// `set_execution_output` skews the executed output away from the quote
/// to exercise the slippage bound.
#[contract]
pub struct MockExchange;

#[contractimpl]
impl MockExchange {
    pub fn set_reserves(e: Env, reserve_in: i128, reserve_out: i128) {
        e.storage()
            .instance()
            .set(&MockExchangeKey::ReserveIn, &reserve_in);
        e.storage()
            .instance()
            .set(&MockExchangeKey::ReserveOut, &reserve_out);
    }

    pub fn set_execution_output(e: Env, amount_out: i128) {
        e.storage()
            .instance()
            .set(&MockExchangeKey::ExecutionOverride, &amount_out);
    }

    pub fn quote(e: Env, _asset_in: Address, _asset_out: Address, amount_in: i128) -> i128 {
        let reserve_in: i128 = e
            .storage()
            .instance()
            .get(&MockExchangeKey::ReserveIn)
            .unwrap();
        let reserve_out: i128 = e
            .storage()
            .instance()
            .get(&MockExchangeKey::ReserveOut)
            .unwrap();
        amount_in * reserve_out / (reserve_in + amount_in)
    }

    pub fn swap(
        e: Env,
        from: Address,
        asset_in: Address,
        asset_out: Address,
        amount_in: i128,
        _min_out: i128,
        to: Address,
        _deadline: u64,
    ) -> i128 {
        let out: i128 = match e
            .storage()
            .instance()
            .get(&MockExchangeKey::ExecutionOverride)
        {
            Some(forced) => forced,
            None => Self::quote(e.clone(), asset_in.clone(), asset_out.clone(), amount_in),
        };

        token::Client::new(&e, &asset_in).transfer(&from, &e.current_contract_address(), &amount_in);
        token::Client::new(&e, &asset_out).transfer(&e.current_contract_address(), &to, &out);
        out
    }
}

// ============================================================================
// TEST SETUP HELPERS
// ============================================================================

pub fn setup() -> (
    Env,
    CheckoutEscrowClient<'static>,
    Address, // admin
    Address, // operator
    Address, // payer
    Address, // settlement token
    token::StellarAssetClient<'static>,
    Address, // exchange
) {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let operator = Address::generate(&env);
    let payer = Address::generate(&env);

    let token_admin = Address::generate(&env);
    let usdc_contract = env.register_stellar_asset_contract_v2(token_admin);
    let usdc = usdc_contract.address();
    let usdc_admin = token::StellarAssetClient::new(&env, &usdc);

    let exchange = env.register(MockExchange, ());

    let contract_id = env.register(CheckoutEscrow, ());
    let client = CheckoutEscrowClient::new(&env, &contract_id);

    client.initialize(
        &admin,
        &usdc,
        &exchange,
        &FEE_BPS,
        &ESCROW_TIMEOUT,
        &MULTISIG_THRESHOLD,
        &SLIPPAGE_BPS,
    );
    client.add_operator(&admin, &operator);

    usdc_admin.mint(&payer, &10_000_000_000);

    (env, client, admin, operator, payer, usdc, usdc_admin, exchange)
}

/// Register a source token for the swap paths, seed the mock exchange
/// with reserves quoting exactly 49.00 settlement for 50.00 source, and
/// give the exchange settlement inventory to pay swaps out of.
pub fn setup_swap(
    env: &Env,
    usdc_admin: &token::StellarAssetClient,
    exchange: &Address,
    payer: &Address,
) -> Address {
    let src_token_admin = Address::generate(env);
    let src_contract = env.register_stellar_asset_contract_v2(src_token_admin);
    let src = src_contract.address();
    token::StellarAssetClient::new(env, &src).mint(payer, &10_000_000_000);

    let mock = MockExchangeClient::new(env, exchange);
    mock.set_reserves(&50_000_000_000, &49_049_000_000);
    usdc_admin.mint(exchange, &10_000_000_000);

    src
}

pub fn advance_ledger(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp += seconds;
    });
}

pub fn balance(env: &Env, token_addr: &Address, who: &Address) -> i128 {
    token::TokenClient::new(env, token_addr).balance(who)
}
