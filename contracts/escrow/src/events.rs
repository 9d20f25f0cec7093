use soroban_sdk::{contractevent, Address, BytesN, String};

/// Event emitted when the escrow is initialized
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEventData {
    #[topic]
    pub admin: Address,
    pub fee_bps: u32,
    pub escrow_timeout: u64,
}

/// Event emitted when a payment enters custody
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEventData {
    #[topic]
    pub payment_id: BytesN<32>,
    #[topic]
    pub payer: Address,
    pub amount: i128,
    pub fee: i128,
    pub order_id: String,
}

/// Event emitted when a payment is released to a recipient
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleasedEventData {
    #[topic]
    pub payment_id: BytesN<32>,
    #[topic]
    pub operator: Address,
    pub amount: i128,
}

/// Event emitted when custody is returned to the payer
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundedEventData {
    #[topic]
    pub payment_id: BytesN<32>,
    #[topic]
    pub payer: Address,
    pub amount: i128,
}

/// Event emitted when a payment is disputed
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputedEventData {
    #[topic]
    pub payment_id: BytesN<32>,
    pub initiator: Address,
}

/// Event emitted when an operator approves a multi-sig payment
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalRecordedEventData {
    #[topic]
    pub payment_id: BytesN<32>,
    pub approver: Address,
    pub approval_count: u32,
}

/// Event emitted when a swap executes against the external exchange
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwappedEventData {
    #[topic]
    pub payer: Address,
    pub asset_in: Address,
    pub amount_in: i128,
    pub amount_out: i128,
}

/// Event emitted when accumulated fees are withdrawn
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesWithdrawnEventData {
    #[topic]
    pub admin: Address,
    pub to: Address,
    pub amount: i128,
}

/// Event emitted when the contract is paused/unpaused
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PausedEventData {
    #[topic]
    pub admin: Address,
    pub is_paused: bool,
}

/// Event emitted when the fee rate is updated
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeRateUpdatedEventData {
    #[topic]
    pub admin: Address,
    pub new_rate: u32,
}

/// Event emitted when the escrow timeout is updated
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeoutUpdatedEventData {
    #[topic]
    pub admin: Address,
    pub new_timeout: u64,
}

/// Event emitted when the multi-sig threshold is updated
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultisigThresholdUpdatedEvent {
    #[topic]
    pub admin: Address,
    pub new_threshold: i128,
}

/// Event emitted when the slippage tolerance is updated
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlippageUpdatedEventData {
    #[topic]
    pub admin: Address,
    pub new_bps: u32,
}

/// Event emitted when an operator is granted the backend role
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorAddedEventData {
    #[topic]
    pub operator: Address,
}

/// Event emitted when an operator loses the backend role
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorRemovedEventData {
    #[topic]
    pub operator: Address,
}
