use soroban_sdk::contracterror;

/// Error codes for the checkout escrow contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract has already been initialized
    AlreadyInitialized = 1,
    /// Contract has not been initialized
    NotInitialized = 2,
    /// Caller does not have the required role
    Unauthorized = 3,
    /// Invalid input parameters provided
    InvalidInput = 4,
    /// Payment not found
    PaymentNotFound = 5,
    /// Derived payment identifier already exists
    PaymentIdCollision = 6,
    /// Operation not permitted from the payment's current status
    InvalidStatus = 7,
    /// Self-service refund requested before the escrow timeout
    TimeoutNotReached = 8,
    /// Token custody transfer failed
    TransferFailed = 9,
    /// Swap output fell below the slippage-bounded minimum
    SlippageExceeded = 10,
    /// Swap deadline has passed
    DeadlineExpired = 11,
    /// Attempted policy value outside the allowed bounds
    PolicyViolation = 12,
    /// Deposits are suspended while the contract is paused
    ContractPaused = 13,
    /// No accumulated fees to withdraw
    NothingToWithdraw = 14,
    /// Operator has already approved this payment
    AlreadyApproved = 15,
    /// Reentrant call rejected
    Reentrancy = 16,
    /// Arithmetic overflow in money computation
    MathOverflow = 17,
}
