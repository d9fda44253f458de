use anyhow::Context;

use crate::domain::{Cents, Transaction, TransactionId, TransactionStatus, User, UserId};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
}

/// Result of creating a transfer
pub struct TransferResult {
    pub transaction: Transaction,
    pub origin_name: String,
    pub destination_name: String,
}

/// Result of settling a pending transfer
pub struct SettlementResult {
    pub transaction: Transaction,
    /// User whose balance was credited: the destination on approval,
    /// the origin (refund) on rejection
    pub credited: User,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // User operations
    // ========================

    /// Create a new user with a starting balance.
    pub async fn create_user(
        &self,
        name: String,
        email: String,
        balance_cents: Cents,
    ) -> Result<User, AppError> {
        if balance_cents < 0 {
            return Err(AppError::NegativeBalance(balance_cents));
        }

        Ok(self.repo.save_user(&name, &email, balance_cents).await?)
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        self.repo
            .get_user(id)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.repo.list_users().await?)
    }

    /// List all transactions involving a user, sent and received merged,
    /// newest first. The user must exist; no transactions is not an error.
    pub async fn user_transactions(&self, id: UserId) -> Result<Vec<Transaction>, AppError> {
        let user = self.get_user(id).await?;

        let mut all = self.repo.list_sent(user.id).await?;
        all.extend(self.repo.list_received(user.id).await?);
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(all)
    }

    // ========================
    // Transfer operations
    // ========================

    /// Create a transfer from origin to destination.
    ///
    /// The origin is always debited up front. Small transfers settle
    /// immediately (destination credited, status APPROVED); transfers at or
    /// above the approval threshold are recorded as PENDING and the
    /// destination credit is deferred until [`Self::update_status`].
    /// All steps run in one atomic unit: a failed check leaves both balances
    /// and the transaction table untouched.
    pub async fn create_transfer(
        &self,
        origin_id: UserId,
        destination_id: UserId,
        amount_cents: Cents,
    ) -> Result<TransferResult, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let status = TransactionStatus::for_amount(amount_cents);

        let mut tx = self.repo.begin().await?;

        let origin = Repository::user_in(&mut tx, origin_id)
            .await?
            .ok_or(AppError::UserNotFound(origin_id))?;

        let destination = Repository::user_in(&mut tx, destination_id)
            .await?
            .ok_or(AppError::UserNotFound(destination_id))?;

        if !origin.can_cover(amount_cents) {
            return Err(AppError::InsufficientFunds {
                user_id: origin_id,
                balance: origin.balance_cents,
                required: amount_cents,
            });
        }

        Repository::adjust_balance_in(&mut tx, origin_id, -amount_cents).await?;

        // Pending transfers hold back the destination credit until approval
        if status != TransactionStatus::Pending {
            Repository::adjust_balance_in(&mut tx, destination_id, amount_cents).await?;
        }

        let transaction =
            Repository::insert_transaction_in(&mut tx, origin_id, destination_id, amount_cents, status)
                .await?;

        tx.commit().await.context("Failed to commit transfer")?;

        Ok(TransferResult {
            transaction,
            origin_name: origin.name,
            destination_name: destination.name,
        })
    }

    /// Settle a pending transaction as APPROVED or REJECTED.
    ///
    /// The origin was already debited at creation, so settlement only ever
    /// credits one side: the destination on approval, the origin (refund) on
    /// rejection. A transaction can be settled exactly once.
    pub async fn update_status(
        &self,
        id: TransactionId,
        target: TransactionStatus,
    ) -> Result<SettlementResult, AppError> {
        if target == TransactionStatus::Pending {
            return Err(AppError::InvalidTargetStatus(target));
        }

        let mut tx = self.repo.begin().await?;

        let mut transaction = Repository::transaction_in(&mut tx, id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))?;

        if transaction.status.is_settled() {
            return Err(AppError::AlreadySettled {
                id,
                status: transaction.status,
            });
        }

        Repository::set_status_in(&mut tx, id, target).await?;

        let credited_id = match target {
            TransactionStatus::Approved => transaction.destination_id,
            TransactionStatus::Rejected => transaction.origin_id,
            TransactionStatus::Pending => unreachable!("rejected above"),
        };

        Repository::adjust_balance_in(&mut tx, credited_id, transaction.amount_cents).await?;

        let credited = Repository::user_in(&mut tx, credited_id)
            .await?
            .ok_or(AppError::UserNotFound(credited_id))?;

        tx.commit().await.context("Failed to commit settlement")?;

        transaction.status = target;
        Ok(SettlementResult {
            transaction,
            credited,
        })
    }

    /// Approve a pending transaction, crediting the destination.
    pub async fn approve(&self, id: TransactionId) -> Result<SettlementResult, AppError> {
        self.update_status(id, TransactionStatus::Approved).await
    }

    /// Reject a pending transaction, refunding the origin.
    pub async fn reject(&self, id: TransactionId) -> Result<SettlementResult, AppError> {
        self.update_status(id, TransactionStatus::Rejected).await
    }

    /// List all transactions, newest first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions().await?)
    }
}
