use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("InsufficientPermission: {sender} does not hold the handler role")]
    InsufficientPermission { sender: String },

    #[error("OnlyExecutor: entry point reserved for the executor itself")]
    OnlyExecutor,

    #[error("ExecutionInProgress: a bridged message is already executing")]
    ExecutionInProgress,

    #[error("NoExecutionInProgress: no bridged message is executing")]
    NoExecutionInProgress,

    #[error("InsufficientGasLimit: required {required}, provided {provided}")]
    InsufficientGasLimit { required: u64, provided: u64 },

    #[error("InvalidActionIndex: {index}")]
    InvalidActionIndex { index: u32 },

    #[error("NotAContract: {address} cannot receive call data")]
    NotAContract { address: String },

    #[error("InsufficientNativeValue: requested {requested}, available {available}")]
    InsufficientNativeValue { requested: String, available: String },

    #[error("InvalidRecipient: {reason}")]
    InvalidRecipient { reason: String },
}
