//! Integration tests for the reporting aggregation.
//!
//! Run with: cargo test -p bodega-integration-tests -- --ignored

use rust_decimal::Decimal;

use bodega_integration_tests::{TestContext, location_of};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_home_renders_totals_and_categories() {
    let ctx = TestContext::new().await;
    ctx.login_as_admin().await;

    let category = ctx.ensure_category("it-reportes").await;
    let product = ctx
        .create_product("it-totales", "10.00", 8, 2, 50, category)
        .await;

    let resp = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("home request");
    assert!(resp.status().is_success());

    let body = resp.text().await.expect("body");
    assert!(body.contains("Total histórico"));
    assert!(body.contains("Última semana"));
    assert!(body.contains("it-reportes"));
    assert!(body.contains("it-totales"));

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_ledger_totals_are_zero_for_all_windows() {
    let ctx = TestContext::new().await;
    ctx.login_as_admin().await;

    ctx.clear_ledger().await;
    assert_eq!(ctx.ledger_total().await, Decimal::ZERO);

    let resp = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("home request");
    assert!(resp.status().is_success());

    let body = resp.text().await.expect("body");
    assert!(body.contains("Total histórico: $0.00"));
    assert!(body.contains("Última semana: $0.00"));
    assert!(body.contains("Hoy: $0.00"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sale_raises_all_time_total_by_its_amount() {
    let ctx = TestContext::new().await;
    ctx.login_as_admin().await;

    let category = ctx.ensure_category("it-reportes").await;
    let product = ctx
        .create_product("it-suma", "10.00", 10, 2, 50, category)
        .await;

    let before = ctx.ledger_total().await;

    let resp = ctx
        .client
        .post(ctx.url(&format!("/productos/vender/{product}")))
        .form(&[("cantidad", "2")])
        .send()
        .await
        .expect("sell request");
    assert!(location_of(&resp).contains("msg="));

    let after = ctx.ledger_total().await;
    assert_eq!(after - before, Decimal::from(20));

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_daily_reset_moves_persisted_baseline() {
    let ctx = TestContext::new().await;
    ctx.login_as_admin().await;

    let before: Option<sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc>> =
        sqlx::query_scalar("SELECT daily_started_at FROM report_state")
            .fetch_optional(&ctx.pool)
            .await
            .expect("read baseline");

    let resp = ctx
        .client
        .post(ctx.url("/ventas/reset-dia"))
        .send()
        .await
        .expect("reset request");
    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("msg="));

    let after: sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc> =
        sqlx::query_scalar("SELECT daily_started_at FROM report_state")
            .fetch_one(&ctx.pool)
            .await
            .expect("read baseline");

    if let Some(before) = before {
        assert!(after >= before, "baseline moved backwards");
    }
}
