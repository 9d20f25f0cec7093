#![no_std]

mod errors;
mod events;
mod exchange;
mod policy;
mod storage;
mod types;

#[cfg(test)]
mod test;

use soroban_sdk::{contract, contractimpl, token, xdr::ToXdr, Address, BytesN, Env, String, Vec};

use crate::errors::Error;
use crate::events::*;
use crate::exchange::ExchangeClient;
use crate::types::*;

// ============================================================================
// Constants
// ============================================================================

/// TTL extension amount for instance storage (30 days)
const INSTANCE_TTL_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;

/// TTL threshold before extending (29 days)
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_AMOUNT - DAY_IN_LEDGERS;

// ============================================================================
// Contract
// ============================================================================

/// Checkout Escrow Smart Contract
///
/// Holds stablecoin custody for web checkout payments:
/// - Deposit with platform fee, direct or via a token swap
/// - Operator-gated release, with two-operator approval of large payments
/// - Timeout-based self-service refund and operator-initiated refund
/// - Dispute freeze with admin resolution to either party
/// - Fee accumulation and admin withdrawal
///
/// Built following Soroban best practices with modular architecture,
/// proper error handling, and comprehensive event emission.
#[contract]
pub struct CheckoutEscrow;

#[contractimpl]
impl CheckoutEscrow {
    // ========================================================================
    // INITIALIZATION
    // ========================================================================

    /// Initialize the escrow contract.
    ///
    /// # Arguments
    /// * `admin` - Address that will have admin privileges
    /// * `settlement_token` - Stablecoin held in custody
    /// * `exchange` - External constant-product exchange for the swap paths
    /// * `fee_bps` - Platform fee in basis points (100 = 1%)
    /// * `escrow_timeout` - Seconds before a payer may self-refund
    /// * `multisig_threshold` - Amount at which release needs two approvals
    /// * `slippage_bps` - Swap slippage tolerance in basis points
    ///
    /// # Errors
    /// * `Error::AlreadyInitialized` - If the contract has already been initialized
    /// * `Error::PolicyViolation` - If a policy value exceeds its cap
    pub fn initialize(
        e: &Env,
        admin: Address,
        settlement_token: Address,
        exchange: Address,
        fee_bps: u32,
        escrow_timeout: u64,
        multisig_threshold: i128,
        slippage_bps: u32,
    ) -> Result<(), Error> {
        admin.require_auth();

        if storage::is_initialized(e) {
            return Err(Error::AlreadyInitialized);
        }

        if fee_bps > policy::MAX_FEE_BPS
            || escrow_timeout > policy::MAX_ESCROW_TIMEOUT
            || slippage_bps > policy::MAX_SLIPPAGE_BPS
        {
            return Err(Error::PolicyViolation);
        }
        if escrow_timeout == 0 || multisig_threshold <= 0 {
            return Err(Error::InvalidInput);
        }

        let config = Config {
            admin: admin.clone(),
            settlement_token,
            exchange,
            fee_bps,
            escrow_timeout,
            multisig_threshold,
            slippage_bps,
            is_paused: false,
            updated_at: e.ledger().timestamp(),
        };

        storage::set_config(e, &config);
        storage::set_initialized(e);
        extend_instance_ttl(e);

        InitializedEventData {
            admin,
            fee_bps,
            escrow_timeout,
        }
        .publish(e);

        Ok(())
    }

    // ========================================================================
    // DEPOSIT
    // ========================================================================

    /// Deposit a payment into escrow custody.
    ///
    /// Pulls `amount` plus the platform fee from the payer, so the payer
    /// must hold and have authorized `amount + fee` of the settlement
    /// token.
    ///
    /// # Arguments
    /// * `payer` - Depositing account
    /// * `amount` - Net settlement amount owed to the recipient
    /// * `order_id` - External order reference (opaque, must be non-empty)
    /// * `merchant_url` - Merchant checkout URL (opaque)
    ///
    /// # Returns
    /// * The derived payment identifier
    ///
    /// # Errors
    /// * `Error::ContractPaused` - While deposits are suspended
    /// * `Error::InvalidInput` - Zero/negative amount or empty order reference
    /// * `Error::TransferFailed` - Payer balance or allowance insufficient
    /// * `Error::PaymentIdCollision` - Identifier already taken
    pub fn deposit(
        e: &Env,
        payer: Address,
        amount: i128,
        order_id: String,
        merchant_url: String,
    ) -> Result<BytesN<32>, Error> {
        payer.require_auth();

        guarded(e, || {
            let config = load_config(e)?;

            if config.is_paused {
                return Err(Error::ContractPaused);
            }
            if amount <= 0 || order_id.is_empty() {
                return Err(Error::InvalidInput);
            }

            let fee = policy::compute_fee(amount, config.fee_bps)?;
            let total = amount.checked_add(fee).ok_or(Error::MathOverflow)?;

            safe_transfer(
                e,
                &config.settlement_token,
                &payer,
                &e.current_contract_address(),
                &total,
            )?;

            create_payment(e, &config, &payer, amount, fee, order_id, merchant_url)
        })
    }

    // ========================================================================
    // SWAP PATHS
    // ========================================================================

    /// Swap another token for the settlement currency and deposit the
    /// output into escrow in the same atomic call.
    ///
    /// The fee is computed on the amount actually received from the
    /// exchange, not on the quoted amount, and the resulting payment goes
    /// through the same state machine as a direct deposit (including
    /// multi-sig gating and disputes).
    ///
    /// # Errors
    /// * `Error::DeadlineExpired` - `deadline` already passed
    /// * `Error::SlippageExceeded` - Executed output below the bounded minimum;
    ///   the whole call rolls back and no record is created
    pub fn swap_and_deposit(
        e: &Env,
        payer: Address,
        asset_in: Address,
        amount_in: i128,
        order_id: String,
        merchant_url: String,
        deadline: u64,
    ) -> Result<BytesN<32>, Error> {
        payer.require_auth();

        guarded(e, || {
            let config = load_config(e)?;

            if config.is_paused {
                return Err(Error::ContractPaused);
            }
            if amount_in <= 0 || order_id.is_empty() || asset_in == config.settlement_token {
                return Err(Error::InvalidInput);
            }

            let amount_out = execute_swap(
                e,
                &config,
                &payer,
                &asset_in,
                amount_in,
                &e.current_contract_address(),
                deadline,
            )?;

            let fee = policy::compute_fee(amount_out, config.fee_bps)?;
            let amount = amount_out.checked_sub(fee).ok_or(Error::MathOverflow)?;

            create_payment(e, &config, &payer, amount, fee, order_id, merchant_url)
        })
    }

    /// Swap another token for the settlement currency and send the output
    /// straight to the caller, without creating a payment record.
    pub fn swap(
        e: &Env,
        caller: Address,
        asset_in: Address,
        amount_in: i128,
        deadline: u64,
    ) -> Result<i128, Error> {
        caller.require_auth();

        guarded(e, || {
            let config = load_config(e)?;

            if config.is_paused {
                return Err(Error::ContractPaused);
            }
            if amount_in <= 0 || asset_in == config.settlement_token {
                return Err(Error::InvalidInput);
            }

            execute_swap(e, &config, &caller, &asset_in, amount_in, &caller, deadline)
        })
    }

    /// Advisory swap quote against the exchange's current reserves.
    ///
    /// No guarantee of execution price: the actual trade recomputes its
    /// own minimum-output bound at execution time.
    pub fn get_swap_quote(e: &Env, asset_in: Address, amount_in: i128) -> Result<i128, Error> {
        let config = load_config(e)?;
        if amount_in <= 0 {
            return Err(Error::InvalidInput);
        }
        let client = ExchangeClient::new(e, &config.exchange);
        Ok(client.quote(&asset_in, &config.settlement_token, &amount_in))
    }

    // ========================================================================
    // RELEASE & REFUND
    // ========================================================================

    /// Release a payment to a recipient (backend operator only).
    ///
    /// Adds the payment's fee to the accumulated-fee counter and
    /// transfers the net amount out of custody.
    ///
    /// # Errors
    /// * `Error::Unauthorized` - Caller is not a backend operator
    /// * `Error::InvalidStatus` - Payment not `Pending`/`Processing`, or a
    ///   multi-sig payment without two approvals
    pub fn release(
        e: &Env,
        operator: Address,
        payment_id: BytesN<32>,
        recipient: Address,
    ) -> Result<(), Error> {
        operator.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if !storage::is_operator(e, &operator) {
                return Err(Error::Unauthorized);
            }

            let payment = load_payment(e, &payment_id)?;
            if !payment.status.is_open() {
                return Err(Error::InvalidStatus);
            }
            if payment.requires_multisig && payment.approval_count < policy::REQUIRED_APPROVALS {
                return Err(Error::InvalidStatus);
            }

            complete_payment(e, &config, payment, &operator, &recipient)
        })
    }

    /// Self-service refund by the payer, once the escrow timeout has
    /// elapsed. Returns the full `amount + fee`.
    ///
    /// # Errors
    /// * `Error::Unauthorized` - Caller is not the payment's payer
    /// * `Error::TimeoutNotReached` - Called before eligibility
    pub fn refund(e: &Env, payer: Address, payment_id: BytesN<32>) -> Result<(), Error> {
        payer.require_auth();

        guarded(e, || {
            let config = load_config(e)?;

            let payment = load_payment(e, &payment_id)?;
            if payment.payer != payer {
                return Err(Error::Unauthorized);
            }
            if !payment.status.is_open() {
                return Err(Error::InvalidStatus);
            }
            if !policy::is_refund_eligible(
                payment.deposit_time,
                e.ledger().timestamp(),
                config.escrow_timeout,
            ) {
                return Err(Error::TimeoutNotReached);
            }

            refund_payment(e, &config, payment)
        })
    }

    /// Operator-initiated refund for immediate failure paths (e.g. a
    /// checkout rejected synchronously). No timeout check.
    pub fn operator_refund(
        e: &Env,
        operator: Address,
        payment_id: BytesN<32>,
    ) -> Result<(), Error> {
        operator.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if !storage::is_operator(e, &operator) {
                return Err(Error::Unauthorized);
            }

            let payment = load_payment(e, &payment_id)?;
            if !payment.status.is_open() {
                return Err(Error::InvalidStatus);
            }

            refund_payment(e, &config, payment)
        })
    }

    // ========================================================================
    // DISPUTES
    // ========================================================================

    /// Freeze a payment in `Disputed`. Callable by the payment's payer or
    /// any backend operator. No custody movement.
    pub fn raise_dispute(e: &Env, caller: Address, payment_id: BytesN<32>) -> Result<(), Error> {
        caller.require_auth();

        guarded(e, || {
            let _config = load_config(e)?;

            let mut payment = load_payment(e, &payment_id)?;
            if caller != payment.payer && !storage::is_operator(e, &caller) {
                return Err(Error::Unauthorized);
            }
            if !payment.status.is_open() {
                return Err(Error::InvalidStatus);
            }

            payment.status = PaymentStatus::Disputed;
            storage::set_payment(e, &payment);

            DisputedEventData {
                payment_id,
                initiator: caller,
            }
            .publish(e);

            Ok(())
        })
    }

    /// Resolve a disputed payment (admin only): either a full refund to
    /// the payer, or a release to `recipient` with the fee retained.
    pub fn resolve_dispute(
        e: &Env,
        admin: Address,
        payment_id: BytesN<32>,
        release_to_payer: bool,
        recipient: Address,
    ) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }

            let payment = load_payment(e, &payment_id)?;
            if payment.status != PaymentStatus::Disputed {
                return Err(Error::InvalidStatus);
            }

            if release_to_payer {
                refund_payment(e, &config, payment)
            } else {
                complete_payment(e, &config, payment, &admin, &recipient)
            }
        })
    }

    // ========================================================================
    // MULTI-SIG APPROVALS
    // ========================================================================

    /// Record an operator's approval of a large payment. The first
    /// approval moves the payment from `Pending` to `Processing`.
    ///
    /// # Errors
    /// * `Error::InvalidStatus` - Payment closed, disputed, or not
    ///   flagged for multi-sig
    /// * `Error::AlreadyApproved` - Same operator approving twice
    pub fn approve(e: &Env, operator: Address, payment_id: BytesN<32>) -> Result<(), Error> {
        operator.require_auth();

        guarded(e, || {
            let _config = load_config(e)?;
            if !storage::is_operator(e, &operator) {
                return Err(Error::Unauthorized);
            }

            let mut payment = load_payment(e, &payment_id)?;
            if !payment.status.is_open() || !payment.requires_multisig {
                return Err(Error::InvalidStatus);
            }
            if storage::has_approved(e, &payment_id, &operator) {
                return Err(Error::AlreadyApproved);
            }

            storage::set_approved(e, &payment_id, &operator);
            payment.approval_count = payment
                .approval_count
                .checked_add(1)
                .ok_or(Error::MathOverflow)?;
            if payment.status == PaymentStatus::Pending {
                payment.status = PaymentStatus::Processing;
            }
            storage::set_payment(e, &payment);

            ApprovalRecordedEventData {
                payment_id,
                approver: operator,
                approval_count: payment.approval_count,
            }
            .publish(e);

            Ok(())
        })
    }

    // ========================================================================
    // FEES & PAUSE
    // ========================================================================

    /// Withdraw the entire accumulated-fee balance (admin only).
    pub fn withdraw_fees(e: &Env, admin: Address, to: Address) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }

            let amount = storage::get_accumulated_fees(e);
            if amount == 0 {
                return Err(Error::NothingToWithdraw);
            }

            storage::set_accumulated_fees(e, 0);
            safe_transfer(
                e,
                &config.settlement_token,
                &e.current_contract_address(),
                &to,
                &amount,
            )?;

            FeesWithdrawnEventData { admin, to, amount }.publish(e);

            Ok(())
        })
    }

    /// Pause or unpause deposits (admin only). Release, refund, dispute
    /// and withdrawal stay available while paused so users can exit
    /// existing positions during an incident.
    pub fn set_paused(e: &Env, admin: Address, paused: bool) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let mut config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }

            config.is_paused = paused;
            config.updated_at = e.ledger().timestamp();
            storage::set_config(e, &config);

            PausedEventData {
                admin,
                is_paused: paused,
            }
            .publish(e);

            Ok(())
        })
    }

    // ========================================================================
    // POLICY ADMINISTRATION
    // ========================================================================

    /// Update the platform fee rate (admin only). Fees already recorded
    /// on existing payments are not touched.
    pub fn set_fee_bps(e: &Env, admin: Address, new_rate: u32) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let mut config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if new_rate > policy::MAX_FEE_BPS {
                return Err(Error::PolicyViolation);
            }

            config.fee_bps = new_rate;
            config.updated_at = e.ledger().timestamp();
            storage::set_config(e, &config);

            FeeRateUpdatedEventData { admin, new_rate }.publish(e);

            Ok(())
        })
    }

    /// Update the self-refund timeout (admin only)
    pub fn set_escrow_timeout(e: &Env, admin: Address, new_timeout: u64) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let mut config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if new_timeout > policy::MAX_ESCROW_TIMEOUT {
                return Err(Error::PolicyViolation);
            }
            if new_timeout == 0 {
                return Err(Error::InvalidInput);
            }

            config.escrow_timeout = new_timeout;
            config.updated_at = e.ledger().timestamp();
            storage::set_config(e, &config);

            TimeoutUpdatedEventData { admin, new_timeout }.publish(e);

            Ok(())
        })
    }

    /// Update the multi-sig amount threshold (admin only)
    pub fn set_multisig_threshold(
        e: &Env,
        admin: Address,
        new_threshold: i128,
    ) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let mut config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if new_threshold <= 0 {
                return Err(Error::InvalidInput);
            }

            config.multisig_threshold = new_threshold;
            config.updated_at = e.ledger().timestamp();
            storage::set_config(e, &config);

            MultisigThresholdUpdatedEvent {
                admin,
                new_threshold,
            }
            .publish(e);

            Ok(())
        })
    }

    /// Update the swap slippage tolerance (admin only)
    pub fn set_slippage_bps(e: &Env, admin: Address, new_bps: u32) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let mut config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if new_bps > policy::MAX_SLIPPAGE_BPS {
                return Err(Error::PolicyViolation);
            }

            config.slippage_bps = new_bps;
            config.updated_at = e.ledger().timestamp();
            storage::set_config(e, &config);

            SlippageUpdatedEventData { admin, new_bps }.publish(e);

            Ok(())
        })
    }

    // ========================================================================
    // OPERATOR REGISTRY
    // ========================================================================

    /// Grant the backend-operator role (admin only)
    pub fn add_operator(e: &Env, admin: Address, operator: Address) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if storage::is_operator(e, &operator) {
                return Err(Error::InvalidInput);
            }

            storage::set_operator(e, &operator);

            OperatorAddedEventData { operator }.publish(e);

            Ok(())
        })
    }

    /// Revoke the backend-operator role (admin only)
    pub fn remove_operator(e: &Env, admin: Address, operator: Address) -> Result<(), Error> {
        admin.require_auth();

        guarded(e, || {
            let config = load_config(e)?;
            if admin != config.admin {
                return Err(Error::Unauthorized);
            }
            if !storage::is_operator(e, &operator) {
                return Err(Error::InvalidInput);
            }

            storage::remove_operator(e, &operator);

            OperatorRemovedEventData { operator }.publish(e);

            Ok(())
        })
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    /// Get a payment record
    pub fn get_payment(e: &Env, payment_id: BytesN<32>) -> Result<Payment, Error> {
        load_payment(e, &payment_id)
    }

    /// Get all payment identifiers for a payer, oldest first
    pub fn get_payments_by_payer(e: &Env, payer: Address) -> Vec<BytesN<32>> {
        storage::get_payer_payments(e, &payer)
    }

    /// Get escrow configuration
    pub fn get_config(e: &Env) -> Result<Config, Error> {
        load_config(e)
    }

    /// Get undrawn accumulated fees
    pub fn get_accumulated_fees(e: &Env) -> Result<i128, Error> {
        let _config = load_config(e)?;
        Ok(storage::get_accumulated_fees(e))
    }

    /// Check if deposits are paused
    pub fn is_paused(e: &Env) -> Result<bool, Error> {
        let config = load_config(e)?;
        Ok(config.is_paused)
    }

    /// Check backend-operator membership
    pub fn is_operator(e: &Env, operator: Address) -> bool {
        storage::is_operator(e, &operator)
    }

    /// Check whether an operator has approved a payment
    pub fn has_approved(e: &Env, payment_id: BytesN<32>, operator: Address) -> bool {
        storage::has_approved(e, &payment_id, &operator)
    }

    // ========================================================================
    // UPGRADE
    // ========================================================================

    /// Replace the contract code (admin only)
    pub fn upgrade(e: &Env, admin: Address, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        admin.require_auth();

        let config = load_config(e)?;
        if admin != config.admin {
            return Err(Error::Unauthorized);
        }

        e.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Run a mutating operation under the global execution lock.
///
/// The lock rejects reentrant calls outright; it is released on every
/// exit path, and the instance TTL is extended when the operation
/// succeeds.
fn guarded<T>(e: &Env, f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    storage::acquire_lock(e)?;
    let result = f();
    if result.is_ok() {
        extend_instance_ttl(e);
    }
    storage::release_lock(e);
    result
}

fn load_config(e: &Env) -> Result<Config, Error> {
    storage::get_config(e).ok_or(Error::NotInitialized)
}

fn load_payment(e: &Env, payment_id: &BytesN<32>) -> Result<Payment, Error> {
    storage::get_payment(e, payment_id).ok_or(Error::PaymentNotFound)
}

/// Move settlement tokens, surfacing any token-side failure as
/// `TransferFailed` so the whole operation aborts cleanly.
fn safe_transfer(
    e: &Env,
    token_addr: &Address,
    from: &Address,
    to: &Address,
    amount: &i128,
) -> Result<(), Error> {
    let client = token::Client::new(e, token_addr);
    match client.try_transfer(from, to, amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Payment identifier: sha256 over the XDR encoding of
/// (payer, order reference, ledger timestamp, ledger sequence).
fn derive_payment_id(e: &Env, payer: &Address, order_id: &String) -> BytesN<32> {
    let seed = PaymentSeed {
        payer: payer.clone(),
        order_id: order_id.clone(),
        timestamp: e.ledger().timestamp(),
        sequence: e.ledger().sequence(),
    };
    let hash = e.crypto().sha256(&seed.to_xdr(e));
    BytesN::from_array(e, &hash.to_array())
}

/// Shared record-creation path for direct and swap-derived deposits.
/// Custody of `amount + fee` must already be in the contract.
fn create_payment(
    e: &Env,
    config: &Config,
    payer: &Address,
    amount: i128,
    fee: i128,
    order_id: String,
    merchant_url: String,
) -> Result<BytesN<32>, Error> {
    let payment_id = derive_payment_id(e, payer, &order_id);
    if storage::payment_exists(e, &payment_id) {
        return Err(Error::PaymentIdCollision);
    }

    let payment = Payment {
        payment_id: payment_id.clone(),
        payer: payer.clone(),
        amount,
        fee,
        deposit_time: e.ledger().timestamp(),
        status: PaymentStatus::Pending,
        order_id: order_id.clone(),
        merchant_url,
        requires_multisig: policy::is_multisig_required(amount, config.multisig_threshold),
        approval_count: 0,
    };

    storage::set_payment(e, &payment);
    storage::add_payer_payment(e, payer, &payment_id);

    DepositedEventData {
        payment_id: payment_id.clone(),
        payer: payer.clone(),
        amount,
        fee,
        order_id,
    }
    .publish(e);

    Ok(payment_id)
}

/// Close a payment as `Completed`: retain the fee, pay out the net
/// amount. Status is committed before the outbound transfer.
fn complete_payment(
    e: &Env,
    config: &Config,
    mut payment: Payment,
    actor: &Address,
    recipient: &Address,
) -> Result<(), Error> {
    payment.status = PaymentStatus::Completed;
    storage::set_payment(e, &payment);

    let fees = storage::get_accumulated_fees(e)
        .checked_add(payment.fee)
        .ok_or(Error::MathOverflow)?;
    storage::set_accumulated_fees(e, fees);

    safe_transfer(
        e,
        &config.settlement_token,
        &e.current_contract_address(),
        recipient,
        &payment.amount,
    )?;

    ReleasedEventData {
        payment_id: payment.payment_id.clone(),
        operator: actor.clone(),
        amount: payment.amount,
    }
    .publish(e);

    Ok(())
}

/// Close a payment as `Refunded`: the full `amount + fee` goes back to
/// the payer, no fee is retained.
fn refund_payment(e: &Env, config: &Config, mut payment: Payment) -> Result<(), Error> {
    payment.status = PaymentStatus::Refunded;
    storage::set_payment(e, &payment);

    let total = payment
        .amount
        .checked_add(payment.fee)
        .ok_or(Error::MathOverflow)?;

    safe_transfer(
        e,
        &config.settlement_token,
        &e.current_contract_address(),
        &payment.payer,
        &total,
    )?;

    RefundedEventData {
        payment_id: payment.payment_id.clone(),
        payer: payment.payer.clone(),
        amount: total,
    }
    .publish(e);

    Ok(())
}

/// Quote, bound, and execute a swap of `asset_in` into the settlement
/// currency, routing the output to `to`. The executed output is checked
/// against the slippage-bounded minimum on this side of the call.
fn execute_swap(
    e: &Env,
    config: &Config,
    payer: &Address,
    asset_in: &Address,
    amount_in: i128,
    to: &Address,
    deadline: u64,
) -> Result<i128, Error> {
    if e.ledger().timestamp() > deadline {
        return Err(Error::DeadlineExpired);
    }

    let exchange = ExchangeClient::new(e, &config.exchange);

    let quote = exchange.quote(asset_in, &config.settlement_token, &amount_in);
    if quote <= 0 {
        return Err(Error::InvalidInput);
    }
    let min_out = policy::min_swap_output(quote, config.slippage_bps)?;

    let amount_out = exchange.swap(
        payer,
        asset_in,
        &config.settlement_token,
        &amount_in,
        &min_out,
        to,
        &deadline,
    );
    if amount_out < min_out {
        return Err(Error::SlippageExceeded);
    }

    SwappedEventData {
        payer: payer.clone(),
        asset_in: asset_in.clone(),
        amount_in,
        amount_out,
    }
    .publish(e);

    Ok(amount_out)
}

/// Extend the TTL of instance storage.
/// Called internally during state-changing operations.
fn extend_instance_ttl(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_AMOUNT);
}
