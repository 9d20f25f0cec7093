use soroban_sdk::{testutils::Address as _, Address, String};

use crate::errors::Error;
use crate::test::{advance_ledger, balance, setup, FEE_BPS};
use crate::types::PaymentStatus;
use crate::{CheckoutEscrow, CheckoutEscrowClient};

#[test]
fn test_deposit() {
    let (env, client, _, _, payer, usdc, _, _) = setup();

    let order_id = String::from_str(&env, "ord-1001");
    let merchant_url = String::from_str(&env, "https://shop.example/checkout");

    let payment_id = client.deposit(&payer, &100_000_000, &order_id, &merchant_url);

    let payment = client.get_payment(&payment_id);
    assert_eq!(payment.payer, payer);
    assert_eq!(payment.amount, 100_000_000);
    assert_eq!(payment.fee, 1_000_000); // 1% of 100.00
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.order_id, order_id);
    assert_eq!(payment.requires_multisig, false);
    assert_eq!(payment.approval_count, 0);

    // Custody holds amount + fee
    assert_eq!(balance(&env, &usdc, &client.address), 101_000_000);
    assert_eq!(balance(&env, &usdc, &payer), 10_000_000_000 - 101_000_000);
}

#[test]
fn test_deposit_zero_amount() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let result = client.try_deposit(
        &payer,
        &0,
        &String::from_str(&env, "ord-1001"),
        &String::from_str(&env, "https://shop.example"),
    );
    assert_eq!(result, Err(Ok(Error::InvalidInput)));
}

#[test]
fn test_deposit_empty_order_id() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let result = client.try_deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, ""),
        &String::from_str(&env, "https://shop.example"),
    );
    assert_eq!(result, Err(Ok(Error::InvalidInput)));
}

#[test]
fn test_deposit_insufficient_balance() {
    let (env, client, _, _, _, usdc, _, _) = setup();

    // Fresh account with no settlement tokens
    let broke = Address::generate(&env);
    let result = client.try_deposit(
        &broke,
        &100_000_000,
        &String::from_str(&env, "ord-1001"),
        &String::from_str(&env, "https://shop.example"),
    );
    assert_eq!(result, Err(Ok(Error::TransferFailed)));

    // Nothing entered custody
    assert_eq!(balance(&env, &usdc, &client.address), 0);
}

#[test]
fn test_deposit_id_collision() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let order_id = String::from_str(&env, "ord-1001");
    let merchant_url = String::from_str(&env, "https://shop.example");

    // Same payer, order reference, timestamp and sequence derive the
    // same identifier; the second call must fail, not overwrite.
    client.deposit(&payer, &100_000_000, &order_id, &merchant_url);
    let result = client.try_deposit(&payer, &100_000_000, &order_id, &merchant_url);
    assert_eq!(result, Err(Ok(Error::PaymentIdCollision)));
}

#[test]
fn test_deposit_ids_distinct() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let merchant_url = String::from_str(&env, "https://shop.example");

    let a = client.deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, "ord-1001"),
        &merchant_url,
    );
    let b = client.deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, "ord-1002"),
        &merchant_url,
    );
    assert_ne!(a, b);

    // Same order reference again in a later ledger is also accepted;
    // duplicates are not reconciled here.
    advance_ledger(&env, 5);
    let c = client.deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, "ord-1001"),
        &merchant_url,
    );
    assert_ne!(a, c);
}

#[test]
fn test_deposit_multisig_flag_from_threshold() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let merchant_url = String::from_str(&env, "https://shop.example");

    // Just below the 1000.00 threshold
    let small = client.deposit(
        &payer,
        &999_999_999,
        &String::from_str(&env, "ord-small"),
        &merchant_url,
    );
    assert_eq!(client.get_payment(&small).requires_multisig, false);

    // At the threshold (inclusive)
    let large = client.deposit(
        &payer,
        &1_000_000_000,
        &String::from_str(&env, "ord-large"),
        &merchant_url,
    );
    assert_eq!(client.get_payment(&large).requires_multisig, true);
}

#[test]
fn test_payer_index_insertion_order() {
    let (env, client, _, _, payer, _, _, _) = setup();

    let merchant_url = String::from_str(&env, "https://shop.example");

    let a = client.deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, "ord-1"),
        &merchant_url,
    );
    let b = client.deposit(
        &payer,
        &200_000_000,
        &String::from_str(&env, "ord-2"),
        &merchant_url,
    );

    let ids = client.get_payments_by_payer(&payer);
    assert_eq!(ids.len(), 2);
    assert_eq!(ids.get(0).unwrap(), a);
    assert_eq!(ids.get(1).unwrap(), b);

    let other = Address::generate(&env);
    assert_eq!(client.get_payments_by_payer(&other).len(), 0);
}

#[test]
fn test_deposit_not_initialized() {
    let env = soroban_sdk::Env::default();
    env.mock_all_auths();

    let contract_id = env.register(CheckoutEscrow, ());
    let client = CheckoutEscrowClient::new(&env, &contract_id);

    let payer = Address::generate(&env);
    let result = client.try_deposit(
        &payer,
        &100_000_000,
        &String::from_str(&env, "ord-1001"),
        &String::from_str(&env, "https://shop.example"),
    );
    assert_eq!(result, Err(Ok(Error::NotInitialized)));
}

#[test]
fn test_initialize_twice() {
    let (_, client, admin, _, _, usdc, _, exchange) = setup();

    let result = client.try_initialize(&admin, &usdc, &exchange, &FEE_BPS, &3600, &1_000_000_000, &50);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_initialize_policy_caps() {
    let env = soroban_sdk::Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let usdc = Address::generate(&env);
    let exchange = Address::generate(&env);

    let contract_id = env.register(CheckoutEscrow, ());
    let client = CheckoutEscrowClient::new(&env, &contract_id);

    // Fee above the 5% cap
    let result = client.try_initialize(&admin, &usdc, &exchange, &501, &3600, &1_000_000_000, &50);
    assert_eq!(result, Err(Ok(Error::PolicyViolation)));

    // Timeout above the 24h cap
    let result = client.try_initialize(&admin, &usdc, &exchange, &100, &86_401, &1_000_000_000, &50);
    assert_eq!(result, Err(Ok(Error::PolicyViolation)));

    // Zero timeout
    let result = client.try_initialize(&admin, &usdc, &exchange, &100, &0, &1_000_000_000, &50);
    assert_eq!(result, Err(Ok(Error::InvalidInput)));
}
