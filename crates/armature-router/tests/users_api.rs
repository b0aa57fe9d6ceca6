//! Full wiring of registry, repository, validation, and routing for a
//! small users API.

use std::sync::Arc;

use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use armature_repo::{EntityPolicy, Record, RepoError, Repository};
use armature_router::{Registry, Request, RequestLogger, Response, Router};
use armature_validate::{FieldRules, RuleSet};

async fn users_pool() -> SqlitePool {
    // A shared in-memory database needs a single connection, otherwise
    // each checkout sees its own empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT,
            email TEXT,
            created_at TEXT,
            updated_at TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool
}

fn users_repository(pool: SqlitePool) -> Repository {
    Repository::new(
        pool,
        EntityPolicy::new()
            .table("users")
            .allowed_fields(&["username", "email"])
            .timestamps(true),
    )
}

fn user_rules() -> RuleSet {
    RuleSet::new()
        .field("username", FieldRules::new().required().alpha_numeric())
        .field(
            "email",
            FieldRules::new().required().email().unique("users", "email"),
        )
}

/// The database pool is registered alongside the repository so handlers
/// can run uniqueness checks.
struct AppState {
    users: Repository,
    rules: RuleSet,
    pool: SqlitePool,
}

async fn list_users(state: Arc<AppState>, _req: Request) -> Response {
    match state.users.get_result(state.users.query()).await {
        Ok(rows) => Response::json(&rows),
        Err(_) => Response::internal_server_error(),
    }
}

async fn show_user(state: Arc<AppState>, req: Request) -> Response {
    let Some(id) = req.params.parse::<i64>("id") else {
        return Response::bad_request();
    };
    let query = state.users.query().where_eq("id", id);
    match state.users.single(query).await {
        Ok(Some(row)) => Response::json(&row),
        Ok(None) => Response::not_found(),
        Err(_) => Response::internal_server_error(),
    }
}

async fn create_user(state: Arc<AppState>, req: Request) -> Response {
    let form = req.form_data();
    let errors = match state.rules.check_with_db(&form, &state.pool).await {
        Ok(errors) => errors,
        Err(_) => return Response::internal_server_error(),
    };
    if !errors.is_empty() {
        return Response::unprocessable(&errors);
    }

    let mut record = Record::new();
    for (key, value) in form {
        record.insert(key, Value::String(value));
    }
    match state.users.save(&record).await {
        Ok(saved) => Response::created(&saved),
        Err(_) => Response::internal_server_error(),
    }
}

async fn delete_user(state: Arc<AppState>, req: Request) -> Response {
    let Some(id) = req.params.parse::<i64>("id") else {
        return Response::bad_request();
    };
    match state.users.delete(id).await {
        Ok(removed) => Response::json(&removed),
        Err(RepoError::NotFound) => Response::not_found(),
        Err(_) => Response::internal_server_error(),
    }
}

fn build_router(registry: &Registry) -> Router {
    let state = registry
        .require::<AppState>("app")
        .expect("state registered at startup");

    let list_state = Arc::clone(&state);
    let show_state = Arc::clone(&state);
    let create_state = Arc::clone(&state);
    let delete_state = state;

    Router::new()
        .middleware(RequestLogger)
        .get("/users", move |req| {
            let state = Arc::clone(&list_state);
            async move { list_users(state, req).await }
        })
        .get("/users/{id}", move |req| {
            let state = Arc::clone(&show_state);
            async move { show_user(state, req).await }
        })
        .post("/users", move |req| {
            let state = Arc::clone(&create_state);
            async move { create_user(state, req).await }
        })
        .delete("/users/{id}", move |req| {
            let state = Arc::clone(&delete_state);
            async move { delete_user(state, req).await }
        })
}

async fn test_app() -> Router {
    let pool = users_pool().await;
    let state = AppState {
        users: users_repository(pool.clone()),
        rules: user_rules(),
        pool,
    };
    let registry = Registry::new().register("app", state);
    build_router(&registry)
}

fn parsed(res: &Response) -> Value {
    serde_json::from_slice(&res.body).unwrap()
}

#[tokio::test]
async fn test_create_then_list() {
    let app = test_app().await;

    let res = app
        .handle(Request::post("/users").body("username=jane&email=jane%40example.com"))
        .await;
    assert_eq!(res.status, 201);
    let created = parsed(&res);
    assert_eq!(created["username"], "jane");
    assert!(created["id"].is_i64());
    assert!(created["created_at"].is_string());

    let res = app.handle(Request::get("/users")).await;
    assert_eq!(res.status, 200);
    let rows = parsed(&res);
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_payload() {
    let app = test_app().await;

    let res = app
        .handle(Request::post("/users").body("username=jane+doe&email=nope"))
        .await;
    assert_eq!(res.status, 422);
    let body = parsed(&res);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn test_create_rejects_duplicate_email() {
    let app = test_app().await;

    let first = Request::post("/users").body("username=jane&email=jane%40example.com");
    assert_eq!(app.handle(first).await.status, 201);

    let second = Request::post("/users").body("username=joe&email=jane%40example.com");
    let res = app.handle(second).await;
    assert_eq!(res.status, 422);
    assert!(res.body_string().unwrap().contains("already in use"));
}

#[tokio::test]
async fn test_show_and_delete() {
    let app = test_app().await;

    let res = app
        .handle(Request::post("/users").body("username=jane&email=jane%40example.com"))
        .await;
    let id = parsed(&res)["id"].as_i64().unwrap();

    let res = app.handle(Request::get(format!("/users/{id}"))).await;
    assert_eq!(res.status, 200);
    assert_eq!(parsed(&res)["username"], "jane");

    let res = app.handle(Request::delete(format!("/users/{id}"))).await;
    assert_eq!(res.status, 200);

    let res = app.handle(Request::get(format!("/users/{id}"))).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app().await;
    let res = app.handle(Request::get("/widgets")).await;
    assert_eq!(res.status, 404);
}
