//! Error types for the domain bridge contract
//!
//! Every message starts with a stable identifier so relayers can branch on
//! the cause without parsing free text.

use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("AccessNotAllowed: {sender} cannot call {function}")]
    AccessNotAllowed { sender: String, function: String },

    #[error("OnlyBridge: proposals can only be processed by the bridge itself")]
    OnlyBridge,

    #[error("UnknownFunction: {function} is not an access-controlled function")]
    UnknownFunction { function: String },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("BridgePaused: deposits and executions are paused")]
    BridgePaused,

    #[error("MpcAddressNotSet: key generation has not completed")]
    MpcAddressNotSet,

    #[error("MpcAddressAlreadySet: key generation already completed")]
    MpcAddressAlreadySet,

    #[error("MpcAddressIsNotUpdatable: the MPC address can only be set once")]
    MpcAddressIsNotUpdatable,

    #[error("InvalidMpcAddress: {reason}")]
    InvalidMpcAddress { reason: String },

    // ========================================================================
    // Proposal Errors (batch-fatal)
    // ========================================================================

    #[error("EmptyProposalsArray: at least one proposal is required")]
    EmptyProposalsArray,

    #[error("InvalidProposalSigner: signature does not recover to the MPC address")]
    InvalidProposalSigner,

    #[error("InvalidSignatureLength: expected 65 bytes, got {got}")]
    InvalidSignatureLength { got: usize },

    #[error("InvalidResourceId: expected 32 bytes, got {got}")]
    InvalidResourceId { got: usize },

    #[error("ResourceIdNotMappedToHandler: {resource_id}")]
    ResourceIdNotMappedToHandler { resource_id: String },

    #[error("MalformedPayload: {reason}")]
    MalformedPayload { reason: String },

    #[error("UnknownReplyId: {id}")]
    UnknownReplyId { id: u64 },

    // ========================================================================
    // Nonce Errors
    // ========================================================================

    #[error("NonceDecrementsNotAllowed: current {current}, requested {requested}")]
    NonceDecrementsNotAllowed { current: u64, requested: u64 },

    // ========================================================================
    // Deposit Validation Errors
    // ========================================================================

    #[error("DepositToCurrentDomain: destination domain {domain_id} is this bridge")]
    DepositToCurrentDomain { domain_id: u8 },

    #[error("ContractNotWhitelisted: {token}")]
    ContractNotWhitelisted { token: String },

    #[error("IncorrectDepositor: payload names {expected}, sender is {got}")]
    IncorrectDepositor { expected: String, got: String },

    #[error("IncorrectFeeSupplied: expected {expected}, got {got}")]
    IncorrectFeeSupplied { expected: String, got: String },

    #[error("IncorrectDepositAmount: expected {expected}, got {got}")]
    IncorrectDepositAmount { expected: String, got: String },

    #[error("InvalidAmount: {reason}")]
    InvalidAmount { reason: String },

    #[error("NotTokenOwner: {depositor} does not own token {token_id}")]
    NotTokenOwner { depositor: String, token_id: String },

    #[error("RequestedFeeTooLarge: max fee {max_fee} exceeds cap {cap}")]
    RequestedFeeTooLarge { max_fee: String, cap: u64 },

    #[error("InvalidFunctionName: {name}")]
    InvalidFunctionName { name: String },

    #[error("InvalidRecipient: {reason}")]
    InvalidRecipient { reason: String },

    // ========================================================================
    // Registry Errors
    // ========================================================================

    #[error("UnsupportedToken: {token} ({reason})")]
    UnsupportedToken { token: String, reason: String },

    #[error("TokenNotRegistered: {token}")]
    TokenNotRegistered { token: String },

    #[error("BurnableNotSupported: {handler} resources cannot be burnable")]
    BurnableNotSupported { handler: String },

    // ========================================================================
    // Decimal Conversion Errors
    // ========================================================================

    #[error("ConversionOverflow: amount does not fit the target precision")]
    ConversionOverflow,

    #[error("ConversionUnderflow: non-zero amount converts to zero canonical units")]
    ConversionUnderflow,

    // ========================================================================
    // Fee & Withdrawal Errors
    // ========================================================================

    #[error("InvalidFeeStrategy: {reason}")]
    InvalidFeeStrategy { reason: String },

    #[error("InvalidWithdrawal: {reason}")]
    InvalidWithdrawal { reason: String },
}

impl ContractError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ContractError::MalformedPayload {
            reason: reason.into(),
        }
    }
}
