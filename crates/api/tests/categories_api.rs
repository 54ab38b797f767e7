//! Integration tests for `/api/v1/categories`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn lists_seeded_categories_in_display_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/categories").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert!(!data.is_empty());
    assert_eq!(data[0]["slug"], "vehicles");

    let orders: Vec<i64> = data
        .iter()
        .map(|c| c["sort_order"].as_i64().unwrap())
        .collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn categories_do_not_need_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/categories").await;

    assert_eq!(response.status(), StatusCode::OK);
}
