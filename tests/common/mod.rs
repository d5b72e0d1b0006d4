#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use invoicing_api::config::AppConfig;
use invoicing_api::db::{establish_connection_with_config, run_migrations, DbConfig, DbPool};
use invoicing_api::mailer::Mailer;
use invoicing_api::services::clients::{create_client, NewClient};
use invoicing_api::services::products::{create_product, NewProduct};
use invoicing_api::AppState;
use rust_decimal::Decimal;

/// Fresh migrated in-memory database. A single connection is forced so the
/// whole test sees one SQLite memory instance.
pub async fn test_db() -> DbPool {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = establish_connection_with_config(&config)
        .await
        .expect("in-memory database");
    run_migrations(&db).await.expect("migrations");
    db
}

/// Config pointing PDF output at a caller-owned temp directory.
pub fn test_config(pdf_dir: &std::path::Path) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        log_json: false,
        auto_migrate: false,
        smtp_host: "smtp.example.com".to_string(),
        smtp_port: 465,
        pdf_dir: pdf_dir.display().to_string(),
        frontend_dir: "frontend".to_string(),
        default_company_name: "Fallback Co".to_string(),
        currency_symbol: "$".to_string(),
    }
}

/// Full router over a fresh migrated in-memory database, for driving the
/// HTTP surface with `tower::ServiceExt::oneshot`. Also returns the pool so
/// tests can inspect state directly.
pub async fn test_app() -> (Router, Arc<DbPool>) {
    let db = Arc::new(test_db().await);
    let config = test_config(&std::env::temp_dir());
    let state = AppState {
        db: db.clone(),
        mailer: Mailer::from_config(&config),
        config,
    };
    (invoicing_api::app_router(state), db)
}

pub async fn seed_client(db: &DbPool, name: &str, email: &str) -> i32 {
    create_client(
        db,
        NewClient {
            name: name.to_string(),
            email: email.to_string(),
            address: String::new(),
            phone: String::new(),
        },
    )
    .await
    .expect("client created")
}

pub async fn seed_product(db: &DbPool, name: &str, price: Decimal) -> i32 {
    create_product(
        db,
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            price,
        },
    )
    .await
    .expect("product created")
}
