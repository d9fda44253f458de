mod common;

use anyhow::Result;
use common::{create_user, test_service};
use denaro::io::{DatabaseSnapshot, Exporter};

#[tokio::test]
async fn test_export_users_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;

    create_user(&service, "Alice", 100000).await?;
    create_user(&service, "Bob", 0).await?;

    let exporter = Exporter::new(&service);
    let mut buf = Vec::new();
    let count = exporter.export_users_csv(&mut buf).await?;
    assert_eq!(count, 2);

    let output = String::from_utf8(buf)?;
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("id,name,email,balance_cents"));
    assert!(output.contains("Alice"));
    assert!(output.contains("bob@example.com"));

    Ok(())
}

#[tokio::test]
async fn test_export_transactions_csv_resolves_names() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let alice = create_user(&service, "Alice", 100000).await?;
    let bob = create_user(&service, "Bob", 0).await?;
    service.create_transfer(alice, bob, 1000).await?;

    let exporter = Exporter::new(&service);
    let mut buf = Vec::new();
    let count = exporter.export_transactions_csv(&mut buf).await?;
    assert_eq!(count, 1);

    let output = String::from_utf8(buf)?;
    assert!(output.contains("Alice"));
    assert!(output.contains("Bob"));
    assert!(output.contains("APPROVED"));

    Ok(())
}

#[tokio::test]
async fn test_full_json_snapshot_round_trips() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let alice = create_user(&service, "Alice", 100000).await?;
    let bob = create_user(&service, "Bob", 0).await?;
    service.create_transfer(alice, bob, 60000).await?;

    let exporter = Exporter::new(&service);
    let mut buf = Vec::new();
    let snapshot = exporter.export_full_json(&mut buf).await?;
    assert_eq!(snapshot.users.len(), 2);
    assert_eq!(snapshot.transactions.len(), 1);

    let parsed: DatabaseSnapshot = serde_json::from_slice(&buf)?;
    assert_eq!(parsed.users.len(), 2);
    assert_eq!(parsed.transactions[0].amount_cents, 60000);

    Ok(())
}
