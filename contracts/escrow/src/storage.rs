use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::errors::Error;
use crate::types::{
    Config, Payment, StorageKey, PERSISTENT_TTL_AMOUNT, PERSISTENT_TTL_THRESHOLD,
};

// ============================================================================
// INITIALIZATION STORAGE
// ============================================================================

/// Check if contract is initialized
pub fn is_initialized(e: &Env) -> bool {
    e.storage()
        .instance()
        .get::<_, bool>(&StorageKey::Initialized)
        .unwrap_or(false)
}

/// Mark contract as initialized
pub fn set_initialized(e: &Env) {
    e.storage().instance().set(&StorageKey::Initialized, &true);
}

// ============================================================================
// REENTRANCY LOCK
// ============================================================================

/// Take the global execution lock, rejecting a reentrant call.
pub fn acquire_lock(e: &Env) -> Result<(), Error> {
    let locked: bool = e
        .storage()
        .instance()
        .get(&StorageKey::Lock)
        .unwrap_or(false);
    if locked {
        return Err(Error::Reentrancy);
    }
    e.storage().instance().set(&StorageKey::Lock, &true);
    Ok(())
}

/// Release the global execution lock
pub fn release_lock(e: &Env) {
    e.storage().instance().set(&StorageKey::Lock, &false);
}

// ============================================================================
// CONFIG STORAGE
// ============================================================================

/// Get escrow configuration
pub fn get_config(e: &Env) -> Option<Config> {
    let key = StorageKey::Config;
    let config = e.storage().persistent().get::<_, Config>(&key);
    if config.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
    }
    config
}

/// Set escrow configuration
pub fn set_config(e: &Env, config: &Config) {
    let key = StorageKey::Config;
    e.storage().persistent().set(&key, config);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

// ============================================================================
// PAYMENT STORAGE
// ============================================================================

/// Get payment record by identifier
pub fn get_payment(e: &Env, payment_id: &BytesN<32>) -> Option<Payment> {
    let key = StorageKey::Payment(payment_id.clone());
    let payment = e.storage().persistent().get::<_, Payment>(&key);
    if payment.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
    }
    payment
}

/// Set payment record
pub fn set_payment(e: &Env, payment: &Payment) {
    let key = StorageKey::Payment(payment.payment_id.clone());
    e.storage().persistent().set(&key, payment);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

/// Check if a payment identifier is already taken
pub fn payment_exists(e: &Env, payment_id: &BytesN<32>) -> bool {
    e.storage()
        .persistent()
        .has(&StorageKey::Payment(payment_id.clone()))
}

// ============================================================================
// PAYER INDEX STORAGE
// ============================================================================

/// Get all payment identifiers for a payer, in insertion order
pub fn get_payer_payments(e: &Env, payer: &Address) -> Vec<BytesN<32>> {
    let key = StorageKey::PayerPayments(payer.clone());
    let payments = e
        .storage()
        .persistent()
        .get::<_, Vec<BytesN<32>>>(&key)
        .unwrap_or(Vec::new(e));
    if !payments.is_empty() {
        e.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
    }
    payments
}

/// Add a payment to a payer's index
pub fn add_payer_payment(e: &Env, payer: &Address, payment_id: &BytesN<32>) {
    let key = StorageKey::PayerPayments(payer.clone());
    let mut payments = get_payer_payments(e, payer);
    payments.push_back(payment_id.clone());
    e.storage().persistent().set(&key, &payments);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

// ============================================================================
// APPROVAL STORAGE
// ============================================================================

/// Check whether an operator has already approved a payment
pub fn has_approved(e: &Env, payment_id: &BytesN<32>, operator: &Address) -> bool {
    e.storage()
        .persistent()
        .has(&StorageKey::Approval(payment_id.clone(), operator.clone()))
}

/// Record an operator's approval of a payment
pub fn set_approved(e: &Env, payment_id: &BytesN<32>, operator: &Address) {
    let key = StorageKey::Approval(payment_id.clone(), operator.clone());
    e.storage().persistent().set(&key, &true);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

// ============================================================================
// OPERATOR REGISTRY STORAGE
// ============================================================================

/// Check backend-operator membership
pub fn is_operator(e: &Env, operator: &Address) -> bool {
    e.storage()
        .persistent()
        .get::<_, bool>(&StorageKey::Operator(operator.clone()))
        .unwrap_or(false)
}

/// Grant the backend-operator role
pub fn set_operator(e: &Env, operator: &Address) {
    let key = StorageKey::Operator(operator.clone());
    e.storage().persistent().set(&key, &true);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

/// Revoke the backend-operator role
pub fn remove_operator(e: &Env, operator: &Address) {
    e.storage()
        .persistent()
        .remove(&StorageKey::Operator(operator.clone()));
}

// ============================================================================
// FEES STORAGE
// ============================================================================

/// Get undrawn accumulated fees
pub fn get_accumulated_fees(e: &Env) -> i128 {
    let key = StorageKey::AccumulatedFees;
    let fees = e.storage().persistent().get::<_, i128>(&key).unwrap_or(0);
    if fees > 0 {
        e.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
    }
    fees
}

/// Set the accumulated-fee counter
pub fn set_accumulated_fees(e: &Env, fees: i128) {
    let key = StorageKey::AccumulatedFees;
    e.storage().persistent().set(&key, &fees);
    e.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}
