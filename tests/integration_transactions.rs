mod common;

use axum::http::{StatusCode, header};

use common::{TestApp, fixtures, get};
use vaultdesk::modules::transactions::model::TransactionType;
use vaultdesk_core::AdminRole;

async fn seeded_app() -> TestApp {
    let app = TestApp::new();
    {
        let mut tables = app.state.ledger.write().await;
        let ada = tables.insert_user(fixtures::user("ada"));
        let grace = tables.insert_user(fixtures::user("grace"));
        tables.insert_transaction(fixtures::transaction(ada.id, 100.0, TransactionType::Deposit));
        let mut transfer = fixtures::transaction(ada.id, 40.0, TransactionType::Transfer);
        transfer.receiver_id = Some(grace.id);
        tables.insert_transaction(transfer);
        tables.insert_transaction(fixtures::transaction(grace.id, 15.0, TransactionType::Withdrawal));
    }
    app
}

#[tokio::test]
async fn test_auditor_exports_csv() {
    let app = seeded_app().await;
    let auditor = app.seed_admin("audit", AdminRole::Auditor).await;
    let router = app.router();

    let response = get(
        &router,
        "/api/admin/transactions/export?transaction_type=transfer",
        &app.token_for(&auditor),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"transactions_export_"));

    let lines: Vec<&str> = response.body.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines[0],
        "TransactionID,Username,Amount,Status,CreatedAt,TransactionType,ReceiverUsername"
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("2,ada,40.00,completed,"));
    assert!(lines[1].ends_with(",transfer,grace"));
}

#[tokio::test]
async fn test_export_filters_by_party() {
    let app = seeded_app().await;
    let manager = app.seed_admin("ops", AdminRole::Manager).await;
    let router = app.router();

    let response = get(
        &router,
        "/api/admin/transactions/export?user_id=2",
        &app.token_for(&manager),
    )
    .await;
    let rows = response.body.split("\r\n").filter(|l| !l.is_empty()).count() - 1;
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn test_listing_filters_and_sorts() {
    let app = seeded_app().await;
    let manager = app.seed_admin("ops", AdminRole::Manager).await;
    let router = app.router();

    let response = get(
        &router,
        "/api/admin/transactions?sort_by=amount&order=desc",
        &app.token_for(&manager),
    )
    .await
    .json();
    assert_eq!(response["total_items"], 3);
    let amounts: Vec<f64> = response["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, [100.0, 40.0, 15.0]);
}

#[tokio::test]
async fn test_analytics_summary() {
    let app = seeded_app().await;
    let auditor = app.seed_admin("audit", AdminRole::Auditor).await;
    let router = app.router();

    let response = get(&router, "/api/admin/analytics/summary", &app.token_for(&auditor)).await;
    assert_eq!(response.status, StatusCode::OK);
    let summary = response.json();
    assert_eq!(summary["data"]["total_users"], 2);
    assert_eq!(summary["data"]["total_transactions"], 3);
    assert_eq!(summary["data"]["total_balance"], 2000.0);
}
