use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Transaction, User};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to external formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format, newest first
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "created_at",
            "origin",
            "destination",
            "amount_cents",
            "status",
        ])?;

        let mut count = 0;
        for transaction in &transactions {
            // Resolve user names for readability
            let origin = self.service.get_user(transaction.origin_id).await?;
            let destination = self.service.get_user(transaction.destination_id).await?;

            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.created_at.to_rfc3339(),
                origin.name,
                destination.name,
                transaction.amount_cents.to_string(),
                transaction.status.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export users and balances to CSV format
    pub async fn export_users_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let users = self.service.list_users().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["id", "name", "email", "balance_cents"])?;

        let mut count = 0;
        for user in &users {
            csv_writer.write_record([
                user.id.to_string(),
                user.name.clone(),
                user.email.clone(),
                user.balance_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export full database as JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let users = self.service.list_users().await?;
        let transactions = self.service.list_transactions().await?;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            users,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
