use pg_change_sink::{apply_records, TargetOpts};
use postgresql_sink::{Destination, DryRunExecutor};
use std::fs::File;
use std::io::Write;
use tokio_util::sync::CancellationToken;

const CHANGES: &str = r#"{"payload":{"name":"alice","age":30}}
{"action":"update","key":{"id":1},"payload":{"name":"bob"}}

{"action":"delete","key":{"id":1},"metadata":{"table":"archive"}}
{"action":"insert","key":{"uid":"u-9"},"payload":{"uid":"ignored","email":"x@example.com"}}
{"action":"delete"}
{"action":"truncate","key":{"id":2}}
{"action":"update","key":"[1,2]","payload":{"name":"carol"}}
"#;

/// End-to-end test for JSONL change records through a dry-run destination
#[tokio::test]
async fn test_jsonl_apply_e2e() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging for the test
    tracing_subscriber::fmt()
        .with_env_filter("pg_change_sink=debug,postgresql_sink=debug")
        .try_init()
        .ok();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("changes.jsonl");
    File::create(&path)?.write_all(CHANGES.as_bytes())?;

    let target = TargetOpts {
        table: Some("users".to_string()),
        key_column_name: Some("id".to_string()),
    };
    let mut destination = Destination::new(target.to_config("postgres://unused"));
    destination.open_with(DryRunExecutor::new());

    let reader = tokio::io::BufReader::new(tokio::fs::File::open(&path).await?);
    let summary = apply_records(&destination, reader, false, &CancellationToken::new()).await?;

    assert_eq!(summary.applied, 5);
    assert_eq!(summary.failed, 2);

    let executed = destination.executor()?.executed();
    let sql: Vec<&str> = executed.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(
        sql,
        vec![
            "INSERT INTO users (age,name) VALUES ($1,$2)",
            "INSERT INTO users (id,name) VALUES ($1,$2) ON CONFLICT (id) DO UPDATE SET name=EXCLUDED.name;",
            "DELETE FROM archive WHERE id = $1",
            "INSERT INTO users (uid,email) VALUES ($1,$2) ON CONFLICT (uid) DO UPDATE SET email=EXCLUDED.email;",
            "INSERT INTO users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING;",
        ]
    );
    assert_eq!(
        executed[3].args,
        vec![serde_json::json!("u-9"), serde_json::json!("x@example.com")]
    );

    destination.teardown().await?;
    Ok(())
}
