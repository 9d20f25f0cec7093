//! Pure fee, timeout, multi-sig and slippage computations.
//!
//! Every numeric policy decision in the contract goes through these
//! functions so the semantics cannot drift between call sites.

use crate::errors::Error;

/// Maximum platform fee (5%)
pub const MAX_FEE_BPS: u32 = 500;

/// Maximum escrow timeout (24 hours)
pub const MAX_ESCROW_TIMEOUT: u64 = 86_400;

/// Maximum slippage tolerance (10%)
pub const MAX_SLIPPAGE_BPS: u32 = 1_000;

/// Distinct operator approvals needed to release a multi-sig payment
pub const REQUIRED_APPROVALS: u32 = 2;

/// Basis points denominator
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Basis-point share of an amount, floored.
fn bps_share(amount: i128, bps: u32) -> Result<i128, Error> {
    amount
        .checked_mul(bps as i128)
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(Error::MathOverflow)
}

/// Platform fee for a settlement amount: `floor(amount * fee_bps / 10000)`.
pub fn compute_fee(amount: i128, fee_bps: u32) -> Result<i128, Error> {
    bps_share(amount, fee_bps)
}

/// Whether a payer may self-refund: `now - deposit_time >= timeout` (inclusive).
pub fn is_refund_eligible(deposit_time: u64, now: u64, timeout: u64) -> bool {
    now.saturating_sub(deposit_time) >= timeout
}

/// Whether a payment needs multi-sig release approval (inclusive threshold).
pub fn is_multisig_required(amount: i128, threshold: i128) -> bool {
    amount >= threshold
}

/// Minimum acceptable swap output: the quote reduced by the slippage tolerance.
pub fn min_swap_output(quote: i128, slippage_bps: u32) -> Result<i128, Error> {
    let cut = bps_share(quote, slippage_bps)?;
    quote.checked_sub(cut).ok_or(Error::MathOverflow)
}
