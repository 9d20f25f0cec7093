use soroban_sdk::{contracttype, Address, BytesN, String};

/// Storage keys for the escrow contract.
#[contracttype]
#[derive(Clone)]
pub enum StorageKey {
    /// Initialization flag
    Initialized,
    /// Reentrancy lock flag
    Lock,
    /// Contract configuration
    Config,
    /// Payment record by identifier
    Payment(BytesN<32>),
    /// Payment identifiers by payer address
    PayerPayments(Address),
    /// Approval flag per payment and operator
    Approval(BytesN<32>, Address),
    /// Backend operator membership
    Operator(Address),
    /// Platform fees accumulated from released payments
    AccumulatedFees,
}

/// Payment lifecycle status
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PaymentStatus {
    /// Funds in custody, no operator has picked the payment up
    Pending = 0,
    /// An operator has started working the payment
    Processing = 1,
    /// Released to the recipient, fee retained
    Completed = 2,
    /// Full amount plus fee returned to the payer
    Refunded = 3,
    /// Frozen pending admin resolution
    Disputed = 4,
}

impl PaymentStatus {
    /// A payment that has not reached a terminal or disputed state.
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Processing)
    }
}

/// An escrowed checkout payment
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payment {
    /// Unique payment identifier
    pub payment_id: BytesN<32>,
    /// Depositing account
    pub payer: Address,
    /// Net settlement amount owed to the recipient (smallest unit)
    pub amount: i128,
    /// Platform fee taken on top of `amount`, fixed at creation
    pub fee: i128,
    /// Ledger timestamp of the deposit
    pub deposit_time: u64,
    /// Current lifecycle status
    pub status: PaymentStatus,
    /// External order reference, informational only
    pub order_id: String,
    /// Merchant checkout URL, informational only
    pub merchant_url: String,
    /// Whether release needs two distinct operator approvals
    pub requires_multisig: bool,
    /// Number of distinct operator approvals recorded
    pub approval_count: u32,
}

/// Seed hashed into a payment identifier
#[contracttype]
#[derive(Clone)]
pub struct PaymentSeed {
    pub payer: Address,
    pub order_id: String,
    pub timestamp: u64,
    pub sequence: u32,
}

/// Escrow configuration
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Admin address with policy and dispute privileges
    pub admin: Address,
    /// Settlement stablecoin held in custody
    pub settlement_token: Address,
    /// External constant-product exchange used by the swap paths
    pub exchange: Address,
    /// Platform fee in basis points
    pub fee_bps: u32,
    /// Seconds before a payer may self-refund
    pub escrow_timeout: u64,
    /// Amount at or above which release needs multi-sig approval
    pub multisig_threshold: i128,
    /// Maximum accepted shortfall between quoted and executed swap output
    pub slippage_bps: u32,
    /// Whether new deposits are suspended
    pub is_paused: bool,
    /// Timestamp of last configuration update
    pub updated_at: u64,
}

/// Number of ledgers in a day (assuming ~5 second block time)
pub const DAY_IN_LEDGERS: u32 = 17280;

/// TTL extension amount for persistent storage (90 days)
pub const PERSISTENT_TTL_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;

/// TTL threshold for persistent storage
pub const PERSISTENT_TTL_THRESHOLD: u32 = PERSISTENT_TTL_AMOUNT - DAY_IN_LEDGERS;
