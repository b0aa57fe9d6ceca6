use std::collections::HashMap;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use armature_validate::{FieldRules, RuleSet, ValidateError};

async fn seeded_pool() -> SqlitePool {
    // A shared in-memory database needs a single connection, otherwise
    // each checkout sees its own empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, username TEXT, email TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO users (username, email) VALUES ('jane', 'jane@example.com')")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect()
}

fn rules() -> RuleSet {
    RuleSet::new().field(
        "username",
        FieldRules::new().required().unique("users", "username"),
    )
}

#[tokio::test]
async fn test_duplicate_value_is_rejected() {
    let pool = seeded_pool().await;
    let errors = rules()
        .check_with_db(&data(&[("username", "jane")]), &pool)
        .await
        .unwrap();
    assert_eq!(errors, vec!["username is already in use"]);
}

#[tokio::test]
async fn test_fresh_value_is_accepted() {
    let pool = seeded_pool().await;
    let errors = rules()
        .check_with_db(&data(&[("username", "joe")]), &pool)
        .await
        .unwrap();
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_current_record_excluded_from_probe() {
    let pool = seeded_pool().await;
    // Updating jane's own record keeps her username available to her.
    let errors = rules()
        .check_with_db(&data(&[("username", "jane"), ("id", "1")]), &pool)
        .await
        .unwrap();
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_other_record_id_still_collides() {
    let pool = seeded_pool().await;
    sqlx::query("INSERT INTO users (username, email) VALUES ('joe', 'joe@example.com')")
        .execute(&pool)
        .await
        .unwrap();
    let errors = rules()
        .check_with_db(&data(&[("username", "jane"), ("id", "2")]), &pool)
        .await
        .unwrap();
    assert_eq!(errors, vec!["username is already in use"]);
}

#[tokio::test]
async fn test_failed_probe_is_an_execution_error() {
    // No users table in this database, so the probe itself fails.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let err = rules()
        .check_with_db(&data(&[("username", "jane")]), &pool)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::Execution(_)));
}

#[tokio::test]
async fn test_sync_violations_still_reported() {
    let pool = seeded_pool().await;
    let errors = rules().check_with_db(&data(&[]), &pool).await.unwrap();
    assert_eq!(errors, vec!["username is required"]);
}
