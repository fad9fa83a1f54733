//! Integration tests against a live PostgreSQL server
//!
//! Run with `PG_CONN_STRING` pointing at a scratch database:
//! `cargo test --test postgres_integration -- --ignored`

use eyre::{Result, WrapErr};
use simple_pipeline::config::{CONN_STRING_VAR, ConnectionString};
use simple_pipeline::dataset::{Dataset, Value};
use simple_pipeline::error::Error;
use simple_pipeline::postgres::{LoadMode, TableIdentifier, TableSync};
use simple_pipeline::storage::parse_csv;
use tokio_postgres::NoTls;

fn conn_string() -> Result<String> {
    std::env::var(CONN_STRING_VAR).wrap_err("PG_CONN_STRING must be set for live tests")
}

async fn query_client() -> Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(&conn_string()?, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });
    Ok(client)
}

/// A fresh table name per test so reruns start from "does not exist"
async fn scratch_table(client: &tokio_postgres::Client, name: &str) -> Result<TableIdentifier> {
    client
        .batch_execute(&format!("DROP TABLE IF EXISTS public.\"{name}\""))
        .await?;
    Ok(TableIdentifier::new("public", name))
}

#[tokio::test]
#[ignore]
async fn test_load_twice_leaves_one_copy() -> Result<()> {
    let client = query_client().await?;
    let table = scratch_table(&client, "pipeline_idempotence").await?;
    let sync = TableSync::new(ConnectionString::new(conn_string()?));

    let dataset = Dataset::from_rows(
        &["fips", "cases"],
        vec![
            vec!["01001".into(), Value::Int(5)],
            vec!["11001".into(), Value::Int(12)],
        ],
    )?;

    let first = sync.sync(&table, &dataset).await?;
    assert_eq!(first.mode, LoadMode::Create);
    assert_eq!(first.rows, 2);

    let second = sync.sync(&table, &dataset).await?;
    assert_eq!(second.mode, LoadMode::AppendAfterTruncate);
    assert_eq!(second.rows, 2);

    let row = client
        .query_one(&format!("SELECT count(*) FROM {}", table.qualified()), &[])
        .await?;
    assert_eq!(row.get::<_, i64>(0), 2);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_special_characters_round_trip() -> Result<()> {
    let client = query_client().await?;
    let table = scratch_table(&client, "pipeline_round_trip").await?;
    let sync = TableSync::new(ConnectionString::new(conn_string()?));

    let dataset = parse_csv(
        b"id,note\n1,\"Smith, \"\"Jr.\"\"\"\n2,\"two\nlines\"\n3,\n",
        "inline",
    )?;
    sync.sync(&table, &dataset).await?;

    let rows = client
        .query(
            &format!("SELECT note FROM {} ORDER BY id", table.qualified()),
            &[],
        )
        .await?;
    let notes: Vec<Option<String>> = rows.iter().map(|r| r.get(0)).collect();
    assert_eq!(
        notes,
        vec![
            Some("Smith, \"Jr.\"".to_string()),
            Some("two\nlines".to_string()),
            None
        ]
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_incompatible_dataset_keeps_existing_rows() -> Result<()> {
    let client = query_client().await?;
    let table = scratch_table(&client, "pipeline_mismatch").await?;
    client
        .batch_execute(&format!(
            "CREATE TABLE {} (fips TEXT, cases BIGINT); INSERT INTO {} VALUES ('01001', 5)",
            table.qualified(),
            table.qualified()
        ))
        .await?;

    let sync = TableSync::new(ConnectionString::new(conn_string()?));
    let dataset = Dataset::from_rows(&["fips", "county"], vec![vec!["01001".into(), "Autauga".into()]])?;

    let err = sync.sync(&table, &dataset).await.unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }), "got {err:?}");

    let row = client
        .query_one(&format!("SELECT count(*) FROM {}", table.qualified()), &[])
        .await?;
    assert_eq!(row.get::<_, i64>(0), 1, "nothing truncated on mismatch");
    Ok(())
}
