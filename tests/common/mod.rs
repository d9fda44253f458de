// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use denaro::application::LedgerService;
use denaro::domain::{Cents, UserId};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Create a user with a derived email and return its id
pub async fn create_user(
    service: &LedgerService,
    name: &str,
    balance_cents: Cents,
) -> Result<UserId> {
    let email = format!("{}@example.com", name.to_lowercase());
    let user = service
        .create_user(name.to_string(), email, balance_cents)
        .await?;
    Ok(user.id)
}

/// Fetch a user's current balance
pub async fn balance_of(service: &LedgerService, id: UserId) -> Result<Cents> {
    Ok(service.get_user(id).await?.balance_cents)
}
