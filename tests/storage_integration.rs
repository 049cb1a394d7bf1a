use std::env;

use credit_report_api::data::db::Database;
use credit_report_api::data::db_storage::CreditReportStorage;
use credit_report_api::extractor::parse_credit_report;

const TWO_ACCOUNTS_XML: &[u8] = include_bytes!("fixtures/experian_two_accounts.xml");

/// Integration smoke test for report storage round trips.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn store_and_fetch_credit_report_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url, 2).await?;
    let storage = CreditReportStorage::new(db.pool.clone());

    let report = parse_credit_report(TWO_ACCOUNTS_XML)?;
    let stored = storage
        .insert(&report, TWO_ACCOUNTS_XML)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let fetched = storage
        .find_by_id(stored.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .ok_or_else(|| anyhow::anyhow!("stored report {} not found", stored.id))?;

    assert_eq!(fetched.report, report);
    assert_eq!(fetched.source_digest, stored.source_digest);

    let listed = storage
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(listed.iter().any(|r| r.id == stored.id));
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_on >= pair[1].created_on));

    Ok(())
}
