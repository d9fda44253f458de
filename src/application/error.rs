use thiserror::Error;

use crate::domain::{Cents, TransactionId, TransactionStatus, UserId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Balance must not be negative (got {0})")]
    NegativeBalance(Cents),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds for user {user_id}: balance {balance}, required {required}")]
    InsufficientFunds {
        user_id: UserId,
        balance: Cents,
        required: Cents,
    },

    #[error("Transaction {id} is already settled as {status}, only pending transactions can be updated")]
    AlreadySettled {
        id: TransactionId,
        status: TransactionStatus,
    },

    #[error("Invalid target status: {0} (expected APPROVED or REJECTED)")]
    InvalidTargetStatus(TransactionStatus),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
