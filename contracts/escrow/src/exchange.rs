use soroban_sdk::{contractclient, Address, Env};

/// Interface of the external constant-product exchange consumed by the
/// swap paths and the quote view.
///
/// The escrow enforces its own slippage bound on the executed output
/// and its own deadline check before invoking `swap`, so quotes are
/// advisory only: a stale quote can at worst make the trade fail, not
/// lose funds.
#[contractclient(name = "ExchangeClient")]
pub trait Exchange {
    /// Spot output of `asset_out` for `amount_in` of `asset_in`
    /// against current reserves. Read-only.
    fn quote(env: Env, asset_in: Address, asset_out: Address, amount_in: i128) -> i128;

    /// Execute a swap: pull `amount_in` of `asset_in` from `from` and
    /// send the output of `asset_out` to `to`. Returns the actual
    /// output amount.
    fn swap(
        env: Env,
        from: Address,
        asset_in: Address,
        asset_out: Address,
        amount_in: i128,
        min_out: i128,
        to: Address,
        deadline: u64,
    ) -> i128;
}
