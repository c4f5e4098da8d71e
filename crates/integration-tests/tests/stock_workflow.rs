//! Integration tests for the restock/sell stock workflow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bodega-server)
//!
//! Run with: cargo test -p bodega-integration-tests -- --ignored

use bodega_integration_tests::{TestContext, location_of};

async fn admin_context() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.login_as_admin().await;
    ctx
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_restock_within_bounds_updates_quantity() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-restock").await;
    let product = ctx
        .create_product("it-agua", "12.00", 10, 5, 20, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/productos/restock"))
        .form(&[
            ("productoID", product.to_string()),
            ("cantidadAgregar", "5".to_string()),
        ])
        .send()
        .await
        .expect("restock request");

    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("msg="));
    assert_eq!(ctx.product_quantity(product).await, 15);

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_restock_beyond_max_leaves_stock_unchanged() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-restock").await;
    let product = ctx
        .create_product("it-refresco", "18.50", 10, 5, 20, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/productos/restock"))
        .form(&[
            ("productoID", product.to_string()),
            ("cantidadAgregar", "11".to_string()),
        ])
        .send()
        .await
        .expect("restock request");

    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("err="));
    assert_eq!(ctx.product_quantity(product).await, 10);

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_quantity_is_rejected() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-restock").await;
    let product = ctx
        .create_product("it-arroz", "28.00", 10, 5, 20, category)
        .await;

    for bad in ["0", "-3", "abc", ""] {
        let resp = ctx
            .client
            .post(ctx.url("/productos/restock"))
            .form(&[
                ("productoID", product.to_string()),
                ("cantidadAgregar", bad.to_string()),
            ])
            .send()
            .await
            .expect("restock request");

        assert!(resp.status().is_redirection());
        assert!(location_of(&resp).contains("err="), "accepted {bad:?}");
    }

    assert_eq!(ctx.product_quantity(product).await, 10);
    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sell_decrements_and_appends_single_ledger_entry() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-ventas").await;
    let product = ctx
        .create_product("it-papas", "15.00", 10, 2, 40, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url(&format!("/productos/vender/{product}")))
        .form(&[("cantidad", "3")])
        .send()
        .await
        .expect("sell request");

    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("msg="));
    assert_eq!(ctx.product_quantity(product).await, 7);
    assert_eq!(ctx.ledger_entries_for(product).await, 1);

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_oversell_changes_nothing() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-ventas").await;
    let product = ctx
        .create_product("it-cacahuates", "14.00", 2, 1, 30, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url(&format!("/productos/vender/{product}")))
        .form(&[("cantidad", "5")])
        .send()
        .await
        .expect("sell request");

    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("err="));
    assert_eq!(ctx.product_quantity(product).await, 2);
    assert_eq!(ctx.ledger_entries_for(product).await, 0);

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sell_exact_remaining_stock_reaches_zero() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-ventas").await;
    let product = ctx
        .create_product("it-galletas", "22.00", 4, 2, 30, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url(&format!("/productos/vender/{product}")))
        .form(&[("cantidad", "4")])
        .send()
        .await
        .expect("sell request");

    assert!(resp.status().is_redirection());
    assert!(location_of(&resp).contains("msg="));
    assert_eq!(ctx.product_quantity(product).await, 0);
    assert_eq!(ctx.ledger_entries_for(product).await, 1);

    ctx.delete_product(product).await;
}

/// End-to-end walk: 10 in stock, sell 3 leaving 7, a restock of 15 is
/// rejected against a maximum of 20, a restock of 13 lands exactly on
/// the maximum.
#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sell_then_restock_to_exact_max() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-escenario").await;
    let product = ctx
        .create_product("it-jugo", "20.00", 10, 5, 20, category)
        .await;

    let resp = ctx
        .client
        .post(ctx.url(&format!("/productos/vender/{product}")))
        .form(&[("cantidad", "3")])
        .send()
        .await
        .expect("sell request");
    assert!(resp.status().is_redirection());
    assert_eq!(ctx.product_quantity(product).await, 7);

    let resp = ctx
        .client
        .post(ctx.url("/productos/restock"))
        .form(&[
            ("productoID", product.to_string()),
            ("cantidadAgregar", "15".to_string()),
        ])
        .send()
        .await
        .expect("restock request");
    assert!(location_of(&resp).contains("err="));
    assert_eq!(ctx.product_quantity(product).await, 7);

    let resp = ctx
        .client
        .post(ctx.url("/productos/restock"))
        .form(&[
            ("productoID", product.to_string()),
            ("cantidadAgregar", "13".to_string()),
        ])
        .send()
        .await
        .expect("restock request");
    assert!(location_of(&resp).contains("msg="));
    assert_eq!(ctx.product_quantity(product).await, 20);

    ctx.delete_product(product).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_low_stock_page_lists_products_at_or_below_min() {
    let ctx = admin_context().await;
    let category = ctx.ensure_category("it-sugerencias").await;
    let low = ctx
        .create_product("it-bajo-stock", "10.00", 3, 5, 50, category)
        .await;
    let ok = ctx
        .create_product("it-stock-sano", "10.00", 30, 5, 50, category)
        .await;

    let resp = ctx
        .client
        .get(ctx.url("/sugerencias"))
        .send()
        .await
        .expect("suggestions request");
    assert!(resp.status().is_success());

    let body = resp.text().await.expect("body");
    assert!(body.contains("it-bajo-stock"));
    assert!(!body.contains("it-stock-sano"));

    ctx.delete_product(low).await;
    ctx.delete_product(ok).await;
}
