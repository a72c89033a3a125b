//! Route definitions for the Khata API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/settings/company",
            get(handlers::get_company_settings).put(handlers::update_company_settings),
        )
        .nest("/categories", category_routes())
        .nest("/customers", customer_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/products", product_routes())
        .nest("/sales", sale_routes())
        .nest("/purchases", purchase_routes())
        .nest("/expenses", expense_routes())
        .nest("/staff", staff_routes())
        .route("/dashboard/stats", get(handlers::get_dashboard_stats))
        .nest("/reports", report_routes())
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/:customer_id/sales", get(handlers::list_customer_sales))
        .route("/:customer_id/balance", post(handlers::adjust_customer_balance))
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route("/:supplier_id/purchases", get(handlers::list_supplier_purchases))
        .route("/:supplier_id/balance", post(handlers::adjust_supplier_balance))
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/sku/:sku", get(handlers::get_product_by_sku))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Sale routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:sale_id",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
        .route("/:sale_id/items", get(handlers::list_sale_items))
}

/// Purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route("/:purchase_id/items", get(handlers::list_purchase_items))
}

/// Expense routes
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_expenses).post(handlers::create_expense))
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}

/// Staff routes
fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_staff).post(handlers::create_staff))
        .route(
            "/:staff_id",
            get(handlers::get_staff)
                .put(handlers::update_staff)
                .delete(handlers::delete_staff),
        )
}

/// Financial report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/profit-loss", get(handlers::get_profit_loss_report))
        .route("/vat", get(handlers::get_vat_report))
}
