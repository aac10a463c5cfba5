use common::CommonError;

/// Coarse classification of pool errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Initialisation state errors.
    Lifecycle,
    /// The caller (or callback responder) is not allowed to do this.
    Authorization,
    /// A referenced stake or pending request does not exist.
    NotFound,
    /// Malformed arguments or responses.
    InvalidParameter,
    /// The ledger would violate one of its accounting invariants.
    Consistency,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    NotOwner = 4,
    NotOperator = 5,
    InvalidSender = 6,
    NotInternal = 7,
    NotProposedAdmin = 8,
    StakeNotFound = 9,
    NoPendingRequest = 10,
    InvalidInput = 11,
    InvalidRatio = 12,
    InvalidBalanceRequest = 13,
    InsufficientBalance = 14,
    TokensIdentical = 15,
    RewardBalanceDecreased = 16,
    ArithmeticError = 17,
    RequestInProgress = 18,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            ContractError::Unauthorized
            | ContractError::NotOwner
            | ContractError::NotOperator
            | ContractError::InvalidSender
            | ContractError::NotInternal
            | ContractError::NotProposedAdmin => ErrorCategory::Authorization,
            ContractError::StakeNotFound | ContractError::NoPendingRequest => {
                ErrorCategory::NotFound
            }
            ContractError::InvalidInput
            | ContractError::InvalidRatio
            | ContractError::InvalidBalanceRequest
            | ContractError::InsufficientBalance
            | ContractError::TokensIdentical => ErrorCategory::InvalidParameter,
            ContractError::RewardBalanceDecreased
            | ContractError::ArithmeticError
            | ContractError::RequestInProgress => ErrorCategory::Consistency,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Pool has not been initialized",
            ContractError::AlreadyInitialized => "Pool is already initialized",
            ContractError::Unauthorized => "Caller is not an active administrator",
            ContractError::NotOwner => "Caller does not own the stake",
            ContractError::NotOperator => "Caller is neither the owner nor an approved operator",
            ContractError::InvalidSender => "Balance response came from an unexpected contract",
            ContractError::NotInternal => "Continuation may only be invoked by the pool itself",
            ContractError::NotProposedAdmin => "Caller was not proposed as administrator",
            ContractError::StakeNotFound => "Stake not found",
            ContractError::NoPendingRequest => "No request is awaiting settlement",
            ContractError::InvalidInput => "Invalid input parameters provided",
            ContractError::InvalidRatio => "Ratio numerator exceeds its denominator",
            ContractError::InvalidBalanceRequest => "Balance response does not match the request",
            ContractError::InsufficientBalance => "Sender does not hold the requested position",
            ContractError::TokensIdentical => "Deposit and reward tokens must differ",
            ContractError::RewardBalanceDecreased => {
                "Reward balance fell below the last observed value"
            }
            ContractError::ArithmeticError => "Arithmetic overflow or underflow",
            ContractError::RequestInProgress => "Another request is already awaiting settlement",
        }
    }
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::NotProposed => ContractError::NotProposedAdmin,
            CommonError::InvalidInput | CommonError::NegativeAmount => ContractError::InvalidInput,
        }
    }
}
