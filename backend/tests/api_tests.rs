//! End-to-end API tests
//!
//! Drive the full router over in-memory storage:
//! - Composite sale/purchase creation and reconciliation
//! - Dashboard and report figures
//! - Error bodies and status codes

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use khata_server::{build_storage, create_app, AppState, Config};

// ============================================================================
// Helpers
// ============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Read a decimal that may be serialized as a string or a number
fn amount(value: &Value) -> Decimal {
    match value {
        Value::String(s) => dec(s),
        Value::Number(n) => dec(&n.to_string()),
        other => panic!("not an amount: {:?}", other),
    }
}

async fn app() -> Router {
    let config = Config::in_memory();
    let storage = build_storage(&config).await.unwrap();
    create_app(AppState::new(storage, config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

async fn create_product(app: &Router, sku: &str, price: &str, stock: i32) -> String {
    let (status, body) = post(
        app,
        "/api/products",
        json!({ "name": format!("Product {}", sku), "sku": sku, "unitPrice": price, "stockQuantity": stock }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn create_customer(app: &Router, name: &str) -> String {
    let (status, body) = post(app, "/api/customers", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn create_supplier(app: &Router, name: &str) -> String {
    let (status, body) = post(app, "/api/suppliers", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn stock_of(app: &Router, product_id: &str) -> i64 {
    let (_, body) = get(app, &format!("/api/products/{}", product_id)).await;
    body["stockQuantity"].as_i64().unwrap()
}

// ============================================================================
// Sales and purchases
// ============================================================================

mod documents {
    use super::*;

    #[tokio::test]
    async fn sale_prices_lines_and_reconciles_stock_and_balance() {
        let app = app().await;
        let customer = create_customer(&app, "Himal Traders").await;
        let a = create_product(&app, "A-1", "100", 10).await;
        let b = create_product(&app, "B-1", "50", 5).await;

        let (status, sale) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [
                    { "productId": a, "quantity": 2, "unitPrice": "100" },
                    { "productId": b, "quantity": 1, "unitPrice": "50" }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "{}", sale);
        assert_eq!(amount(&sale["subtotal"]), dec("250"));
        assert_eq!(amount(&sale["vatAmount"]), dec("32.5"));
        assert_eq!(amount(&sale["totalAmount"]), dec("282.5"));
        assert!(sale["invoiceNumber"].as_str().unwrap().starts_with("INV-"));
        assert_eq!(sale["status"], "pending");

        assert_eq!(stock_of(&app, &a).await, 8);
        assert_eq!(stock_of(&app, &b).await, 4);

        let (_, customer_body) = get(&app, &format!("/api/customers/{}", customer)).await;
        assert_eq!(amount(&customer_body["outstandingBalance"]), dec("282.5"));

        let sale_id = sale["id"].as_str().unwrap();
        let (status, items) = get(&app, &format!("/api/sales/{}/items", sale_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items.as_array().unwrap().len(), 2);
        assert_eq!(amount(&items[0]["totalPrice"]), dec("200"));
        assert_eq!(amount(&items[1]["vatAmount"]), dec("6.5"));
    }

    #[tokio::test]
    async fn oversized_sale_floors_stock_at_zero() {
        let app = app().await;
        let customer = create_customer(&app, "Bulk Buyer").await;
        let product = create_product(&app, "LOW-1", "10", 1).await;

        let (status, _) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [{ "productId": product, "quantity": 5, "unitPrice": "10" }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(stock_of(&app, &product).await, 0);
    }

    #[tokio::test]
    async fn purchase_increments_stock_and_supplier_balance() {
        let app = app().await;
        let supplier = create_supplier(&app, "Everest Supply").await;
        let a = create_product(&app, "P-A", "100", 0).await;
        let b = create_product(&app, "P-B", "50", 3).await;

        let (status, purchase) = post(
            &app,
            "/api/purchases",
            json!({
                "supplierId": supplier,
                "items": [
                    { "productId": a, "quantity": 2, "unitPrice": "100" },
                    { "productId": b, "quantity": 1, "unitPrice": "50" }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "{}", purchase);
        assert_eq!(amount(&purchase["totalAmount"]), dec("282.5"));
        assert!(purchase["billNumber"].as_str().unwrap().starts_with("PO-"));
        assert_eq!(stock_of(&app, &a).await, 2);
        assert_eq!(stock_of(&app, &b).await, 4);

        let (_, supplier_body) = get(&app, &format!("/api/suppliers/{}", supplier)).await;
        assert_eq!(amount(&supplier_body["outstandingBalance"]), dec("282.5"));

        let (_, purchases) = get(&app, &format!("/api/suppliers/{}/purchases", supplier)).await;
        assert_eq!(purchases.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_product_aborts_the_whole_sale() {
        let app = app().await;
        let customer = create_customer(&app, "Careful Co").await;
        let product = create_product(&app, "REAL-1", "100", 10).await;

        let (status, body) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [
                    { "productId": product, "quantity": 2, "unitPrice": "100" },
                    { "productId": uuid::Uuid::new_v4(), "quantity": 1, "unitPrice": "50" }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);
        assert_eq!(body["code"], "NOT_FOUND");

        let (_, sales) = get(&app, "/api/sales").await;
        assert!(sales.as_array().unwrap().is_empty());
        assert_eq!(stock_of(&app, &product).await, 10);
        let (_, customer_body) = get(&app, &format!("/api/customers/{}", customer)).await;
        assert_eq!(amount(&customer_body["outstandingBalance"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn sale_without_customer_is_rejected() {
        let app = app().await;
        let product = create_product(&app, "NC-1", "100", 10).await;

        let (status, body) = post(
            &app,
            "/api/sales",
            json!({ "items": [{ "productId": product, "quantity": 1, "unitPrice": "100" }] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "customerId");
        assert_eq!(stock_of(&app, &product).await, 10);
    }

    #[tokio::test]
    async fn sale_for_unknown_customer_is_not_found() {
        let app = app().await;
        let (status, body) = post(
            &app,
            "/api/sales",
            json!({ "customerId": uuid::Uuid::new_v4(), "subtotal": "100", "totalAmount": "113", "vatAmount": "13" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Customer not found");
    }

    #[tokio::test]
    async fn bad_line_names_its_index() {
        let app = app().await;
        let customer = create_customer(&app, "Line Checker").await;
        let product = create_product(&app, "LC-1", "100", 10).await;

        let (status, body) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [
                    { "productId": product, "quantity": 1, "unitPrice": "100" },
                    { "productId": product, "quantity": 0, "unitPrice": "100" }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "items[1].quantity");
    }

    #[tokio::test]
    async fn oversized_unit_price_is_rejected() {
        let app = app().await;
        let customer = create_customer(&app, "Big Spender").await;
        let product = create_product(&app, "BIG-1", "100", 10).await;

        let (status, body) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [
                    { "productId": product, "quantity": 3, "unitPrice": "30000000000000000000000000000" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "items[0].unitPrice");

        let (status, sales) = get(&app, "/api/sales").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sales.as_array().unwrap().len(), 0);
        assert_eq!(stock_of(&app, &product).await, 10);
    }

    #[tokio::test]
    async fn deleting_a_sale_removes_its_items() {
        let app = app().await;
        let customer = create_customer(&app, "Short Lived").await;
        let product = create_product(&app, "DEL-1", "20", 10).await;

        let (_, sale) = post(
            &app,
            "/api/sales",
            json!({
                "customerId": customer,
                "items": [{ "productId": product, "quantity": 1, "unitPrice": "20" }]
            }),
        )
        .await;
        let sale_id = sale["id"].as_str().unwrap();

        let (status, body) = delete(&app, &format!("/api/sales/{}", sale_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, items) = get(&app, &format!("/api/sales/{}/items", sale_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items, json!([]));

        let (status, _) = get(&app, &format!("/api/sales/{}", sale_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = delete(&app, &format!("/api/sales/{}", sale_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn customer_with_sales_cannot_be_deleted() {
        let app = app().await;
        let customer = create_customer(&app, "Loyal").await;
        post(
            &app,
            "/api/sales",
            json!({ "customerId": customer, "subtotal": "100", "totalAmount": "100" }),
        )
        .await;

        let (status, body) = delete(&app, &format!("/api/customers/{}", customer)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (_, sales) = get(&app, &format!("/api/customers/{}/sales", customer)).await;
        assert_eq!(sales.as_array().unwrap().len(), 1);
    }
}

// ============================================================================
// Balances
// ============================================================================

mod balances {
    use super::*;

    #[tokio::test]
    async fn payment_larger_than_balance_floors_at_zero() {
        let app = app().await;
        let customer = create_customer(&app, "Overpayer").await;
        post(
            &app,
            "/api/sales",
            json!({ "customerId": customer, "subtotal": "100", "totalAmount": "100" }),
        )
        .await;

        let (status, outcome) = post(
            &app,
            &format!("/api/customers/{}/balance", customer),
            json!({ "delta": "-250" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["applied"], true);

        let (_, body) = get(&app, &format!("/api/customers/{}", customer)).await;
        assert_eq!(amount(&body["outstandingBalance"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn adjusting_an_unknown_supplier_is_not_found() {
        let app = app().await;
        let (status, _) = post(
            &app,
            &format!("/api/suppliers/{}/balance", uuid::Uuid::new_v4()),
            json!({ "delta": "10" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn overflowing_adjustment_is_rejected_and_store_stays_usable() {
        let app = app().await;
        let customer = create_customer(&app, "Overflow").await;
        let uri = format!("/api/customers/{}/balance", customer);

        let (status, body) =
            post(&app, &uri, json!({ "delta": "79228162514264337593543950335" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "delta");

        let (status, _) = get(&app, "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&app, "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::OK);

        let (status, outcome) = post(&app, &uri, json!({ "delta": "1" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["applied"], true);
        let (_, body) = get(&app, &format!("/api/customers/{}", customer)).await;
        assert_eq!(amount(&body["outstandingBalance"]), dec("1"));
    }

    #[tokio::test]
    async fn oversized_header_total_is_rejected() {
        let app = app().await;
        let supplier = create_supplier(&app, "Huge Bill").await;
        let (status, body) = post(
            &app,
            "/api/purchases",
            json!({
                "supplierId": supplier,
                "subtotal": "1",
                "totalAmount": "79228162514264337593543950335"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "totalAmount");

        let (status, _) = get(&app, "/api/suppliers").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn record_update_cannot_touch_balance_or_stock() {
        let app = app().await;
        let customer = create_customer(&app, "Steady").await;
        post(
            &app,
            &format!("/api/customers/{}/balance", customer),
            json!({ "delta": "40" }),
        )
        .await;
        let (status, body) = put(
            &app,
            &format!("/api/customers/{}", customer),
            json!({ "name": "Steady Ltd", "outstandingBalance": "0" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Steady Ltd");
        assert_eq!(amount(&body["outstandingBalance"]), dec("40"));

        let product = create_product(&app, "FIX-1", "10", 7).await;
        let (_, body) = put(
            &app,
            &format!("/api/products/{}", product),
            json!({ "unitPrice": "12", "stockQuantity": 100 }),
        )
        .await;
        assert_eq!(body["stockQuantity"], 7);
        assert_eq!(amount(&body["unitPrice"]), dec("12"));
    }
}

// ============================================================================
// Dashboard and reports
// ============================================================================

mod reports {
    use super::*;

    #[tokio::test]
    async fn revenue_counts_only_paid_sales() {
        let app = app().await;
        let customer = create_customer(&app, "Prompt Payer").await;
        let (_, sale) = post(
            &app,
            "/api/sales",
            json!({ "customerId": customer, "subtotal": "200", "vatAmount": "26", "totalAmount": "226", "status": "paid" }),
        )
        .await;
        let sale_id = sale["id"].as_str().unwrap();

        let (status, stats) = get(&app, "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(amount(&stats["totalRevenue"]), dec("226"));
        assert_eq!(amount(&stats["vatCollected"]), dec("26"));
        assert_eq!(amount(&stats["outstandingAmount"]), Decimal::ZERO);
        assert_eq!(stats["totalCustomers"], 1);

        let (status, updated) =
            put(&app, &format!("/api/sales/{}", sale_id), json!({ "status": "pending" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "pending");

        let (_, stats) = get(&app, "/api/dashboard/stats").await;
        assert_eq!(amount(&stats["totalRevenue"]), Decimal::ZERO);
        assert_eq!(amount(&stats["outstandingAmount"]), dec("226"));
    }

    #[tokio::test]
    async fn low_stock_and_overdue_counts() {
        let app = app().await;
        create_product(&app, "LS-1", "10", 5).await;
        create_product(&app, "LS-2", "10", 50).await;
        let customer = create_customer(&app, "Late").await;
        post(
            &app,
            "/api/sales",
            json!({ "customerId": customer, "subtotal": "10", "totalAmount": "10", "status": "overdue" }),
        )
        .await;

        let (_, stats) = get(&app, "/api/dashboard/stats").await;
        assert_eq!(stats["lowStockProducts"], 1);
        assert_eq!(stats["totalProducts"], 2);
        assert_eq!(stats["overdueCount"], 1);
        assert_eq!(amount(&stats["outstandingAmount"]), dec("10"));
    }

    async fn seed_vat_scenario(app: &Router) {
        let customer = create_customer(app, "VAT Buyer").await;
        let supplier = create_supplier(app, "VAT Seller").await;
        post(
            app,
            "/api/sales",
            json!({ "customerId": customer, "subtotal": "1000", "vatAmount": "130", "totalAmount": "1130", "status": "paid" }),
        )
        .await;
        post(
            app,
            "/api/purchases",
            json!({ "supplierId": supplier, "subtotal": "500", "vatAmount": "50", "totalAmount": "550" }),
        )
        .await;
        let (status, _) = post(
            app,
            "/api/expenses",
            json!({ "title": "Rent", "amount": "100", "category": "Office", "isVatApplicable": true, "vatAmount": "10" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        // VAT on an expense that is not flagged is not claimable
        post(
            app,
            "/api/expenses",
            json!({ "title": "Tea", "amount": "20", "category": "Office", "vatAmount": "2" }),
        )
        .await;
    }

    #[tokio::test]
    async fn vat_report_nets_collected_against_paid() {
        let app = app().await;
        seed_vat_scenario(&app).await;

        let (status, report) = get(&app, "/api/reports/vat").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(amount(&report["vatCollected"]), dec("130"));
        assert_eq!(amount(&report["vatPaid"]), dec("50"));
        assert_eq!(amount(&report["vatOnExpenses"]), dec("10"));
        assert_eq!(amount(&report["netVATPayable"]), dec("70"));
        assert_eq!(report["position"], "payable");
    }

    #[tokio::test]
    async fn profit_loss_report() {
        let app = app().await;
        seed_vat_scenario(&app).await;

        let (status, report) = get(&app, "/api/reports/profit-loss").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(amount(&report["totalRevenue"]), dec("1130"));
        assert_eq!(amount(&report["totalPurchases"]), dec("550"));
        assert_eq!(amount(&report["totalExpenses"]), dec("120"));
        assert_eq!(amount(&report["grossProfit"]), dec("580"));
        assert_eq!(amount(&report["netProfit"]), dec("460"));
    }

    #[tokio::test]
    async fn reports_export_as_csv() {
        let app = app().await;
        seed_vat_scenario(&app).await;

        let request = Request::builder()
            .uri("/api/reports/vat?format=csv")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("metric,amount"));
        assert!(text.contains("Net VAT Payable,70"));
    }

    #[tokio::test]
    async fn reversed_date_range_is_rejected() {
        let app = app().await;
        let (status, body) =
            get(&app, "/api/reports/profit-loss?from=2024-02-01&to=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "from");
    }

    #[tokio::test]
    async fn malformed_date_filter_is_a_json_bad_request() {
        let app = app().await;
        for uri in [
            "/api/reports/vat?from=notadate",
            "/api/reports/profit-loss?to=2024-13-45",
        ] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["code"], "VALIDATION_ERROR", "{}", uri);
        }
    }

    #[tokio::test]
    async fn zero_minimum_stock_level_uses_default() {
        let app = app().await;
        let product = create_product(&app, "ZM-1", "10", 3).await;
        let (status, _) = put(
            &app,
            &format!("/api/products/{}", product),
            json!({ "minStockLevel": 0 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, stats) = get(&app, "/api/dashboard/stats").await;
        assert_eq!(stats["lowStockProducts"], 1);
    }

    #[tokio::test]
    async fn date_range_excludes_documents_outside_it() {
        let app = app().await;
        seed_vat_scenario(&app).await;
        let (_, report) = get(&app, "/api/reports/vat?from=2000-01-01&to=2000-12-31").await;
        assert_eq!(amount(&report["netVATPayable"]), Decimal::ZERO);
    }
}

// ============================================================================
// Catalogue, settings, staff
// ============================================================================

mod records {
    use super::*;

    #[tokio::test]
    async fn default_categories_and_settings_are_seeded() {
        let app = app().await;
        let (_, categories) = get(&app, "/api/categories").await;
        assert_eq!(categories.as_array().unwrap().len(), 4);

        let (status, settings) = get(&app, "/api/settings/company").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(amount(&settings["vatRate"]), dec("13"));
        assert_eq!(settings["taxYear"], "2080-81");
    }

    #[tokio::test]
    async fn settings_update_is_partial_and_validated() {
        let app = app().await;
        let (status, settings) =
            put(&app, "/api/settings/company", json!({ "companyName": "Khata Pasal" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings["companyName"], "Khata Pasal");
        assert_eq!(amount(&settings["vatRate"]), dec("13"));

        let (status, body) =
            put(&app, "/api/settings/company", json!({ "taxYear": "2080" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "taxYear");
    }

    #[tokio::test]
    async fn duplicate_sku_conflicts() {
        let app = app().await;
        create_product(&app, "DUP-1", "10", 1).await;
        let (status, body) = post(
            &app,
            "/api/products",
            json!({ "name": "Again", "sku": "DUP-1", "unitPrice": "10" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_ENTRY");
        assert_eq!(body["field"], "sku");

        let (status, found) = get(&app, "/api/products/sku/DUP-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["name"], "Product DUP-1");
    }

    #[tokio::test]
    async fn deleting_a_category_unlinks_its_products() {
        let app = app().await;
        let (_, category) = post(&app, "/api/categories", json!({ "name": "Tools" })).await;
        let category_id = category["id"].as_str().unwrap();
        let (_, product) = post(
            &app,
            "/api/products",
            json!({ "name": "Hammer", "sku": "HAM-1", "unitPrice": "500", "categoryId": category_id }),
        )
        .await;

        let (status, _) = delete(&app, &format!("/api/categories/{}", category_id)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, product) = get(&app, &format!("/api/products/{}", product["id"].as_str().unwrap())).await;
        assert_eq!(product["categoryId"], Value::Null);
    }

    #[tokio::test]
    async fn staff_password_hash_is_never_returned() {
        let app = app().await;
        let (status, member) = post(
            &app,
            "/api/staff",
            json!({ "username": "sita", "password": "correct horse", "fullName": "Sita Sharma", "role": "accountant" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", member);
        assert_eq!(member["role"], "accountant");
        assert!(member.get("passwordHash").is_none());
        assert!(member.get("password").is_none());

        let (status, body) = post(
            &app,
            "/api/staff",
            json!({ "username": "sita", "password": "another one", "fullName": "Other" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["field"], "username");
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let app = app().await;
        let id = uuid::Uuid::new_v4();
        for uri in [
            format!("/api/customers/{}", id),
            format!("/api/suppliers/{}", id),
            format!("/api/products/{}", id),
            format!("/api/purchases/{}", id),
            format!("/api/expenses/{}", id),
            format!("/api/staff/{}", id),
        ] {
            let (status, body) = get(&app, &uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn malformed_path_id_is_a_json_bad_request() {
        let app = app().await;
        let (status, body) = get(&app, "/api/sales/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());

        let (status, body) = post(
            &app,
            "/api/customers/not-a-uuid/balance",
            json!({ "delta": "10" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/customers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_storage() {
        let app = app().await;
        for uri in ["/health", "/api/health"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["database"], "connected");
        }
    }
}
