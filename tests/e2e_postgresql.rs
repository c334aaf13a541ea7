//! Live PostgreSQL test. Skipped unless `POSTGRESQL_TEST_URL` is set.

use postgresql_sink::{PostgresDestination, SinkError};
use std::collections::HashMap;
use sync_core::{Action, ChangeRecord, METADATA_ACTION, METADATA_TABLE};
use tokio_postgres::NoTls;

const TABLE: &str = "pg_change_sink_users";
const ARCHIVE: &str = "pg_change_sink_archive";

async fn reset_tables(client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
    for table in [TABLE, ARCHIVE] {
        client
            .batch_execute(&format!(
                "DROP TABLE IF EXISTS {table};
                 CREATE TABLE {table} (
                     id BIGINT PRIMARY KEY,
                     name TEXT,
                     score DOUBLE PRECISION,
                     active BOOLEAN,
                     tags JSONB
                 );"
            ))
            .await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_postgresql_destination_e2e() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("pg_change_sink=debug,postgresql_sink=debug")
        .try_init()
        .ok();

    let Ok(url) = std::env::var("POSTGRESQL_TEST_URL") else {
        println!("POSTGRESQL_TEST_URL not set, skipping");
        return Ok(());
    };

    let (client, connection) = tokio_postgres::connect(&url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error: {e}");
        }
    });
    reset_tables(&client).await?;

    let settings: HashMap<String, String> = [
        ("url", url.as_str()),
        ("table", TABLE),
        ("keyColumnName", "id"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut destination = PostgresDestination::configure(&settings);
    destination.open().await?;

    // Insert, then upsert over the same key
    let rows = destination
        .write(
            &ChangeRecord::new()
                .with_key(r#"{"id":1}"#)
                .with_payload(r#"{"name":"alice","score":1.5,"active":true,"tags":["a","b"]}"#),
        )
        .await?;
    assert_eq!(rows, 1);

    destination
        .write(
            &ChangeRecord::new()
                .with_action(Action::Update)
                .with_key(r#"{"id":1}"#)
                .with_payload(r#"{"name":"alicia","score":2}"#),
        )
        .await?;

    let row = client
        .query_one(
            &format!("SELECT name, score, active, tags FROM {TABLE} WHERE id = 1"),
            &[],
        )
        .await?;
    assert_eq!(row.get::<_, String>(0), "alicia");
    assert_eq!(row.get::<_, f64>(1), 2.0);
    assert!(row.get::<_, bool>(2));
    assert_eq!(
        row.get::<_, serde_json::Value>(3),
        serde_json::json!(["a", "b"])
    );

    // Metadata overrides route a second record to the archive table
    destination
        .write(
            &ChangeRecord::new()
                .with_key(r#"{"id":7}"#)
                .with_payload(r#"{"name":"old"}"#)
                .with_metadata(METADATA_TABLE, ARCHIVE),
        )
        .await?;
    let archived: i64 = client
        .query_one(&format!("SELECT count(*) FROM {ARCHIVE}"), &[])
        .await?
        .get(0);
    assert_eq!(archived, 1);

    // A duplicate plain insert without a key surfaces as an execution error
    let err = destination
        .write(&ChangeRecord::new().with_payload(r#"{"id":1,"name":"dup"}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, SinkError::Execution(_)));

    // The destination stays usable after a failed record
    let rows = destination
        .write(
            &ChangeRecord::new()
                .with_key(r#"{"id":1}"#)
                .with_metadata(METADATA_ACTION, "delete"),
        )
        .await?;
    assert_eq!(rows, 1);

    let remaining: i64 = client
        .query_one(&format!("SELECT count(*) FROM {TABLE}"), &[])
        .await?
        .get(0);
    assert_eq!(remaining, 0);

    destination.flush().await?;
    destination.teardown().await?;

    client
        .batch_execute(&format!("DROP TABLE {TABLE}; DROP TABLE {ARCHIVE};"))
        .await?;
    Ok(())
}
