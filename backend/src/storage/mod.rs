//! Storage boundary
//!
//! Services talk to an `Arc<dyn Storage>` built once at start-up. Two
//! implementations exist: PostgreSQL for deployments and an in-memory store
//! for development and tests. Both enforce the same rules:
//!
//! - stock and outstanding balances are changed by clamped increments and
//!   never go below zero
//! - a sale or purchase is written together with its items, stock movements
//!   and counterparty balance, or not at all
//! - record updates never write stock or balances; those columns belong to the
//!   increment operations

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{
    Category, CompanySettings, Customer, Expense, Product, Purchase, PurchaseItem,
    PurchaseWithItems, Sale, SaleItem, SaleWithItems, StaffMember, Supplier,
};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Storage connectivity check behind `/health`
    async fn ping(&self) -> AppResult<()>;

    /// Create company settings and the default categories if none exist
    async fn seed_defaults(&self) -> AppResult<()>;

    // Company settings
    async fn get_company_settings(&self) -> AppResult<Option<CompanySettings>>;
    async fn save_company_settings(&self, settings: &CompanySettings) -> AppResult<()>;

    // Categories
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>>;
    async fn insert_category(&self, category: &Category) -> AppResult<()>;
    async fn update_category(&self, category: &Category) -> AppResult<bool>;
    /// Products of a deleted category are kept, without a category
    async fn delete_category(&self, id: Uuid) -> AppResult<bool>;

    // Products
    async fn list_products(&self) -> AppResult<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn get_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;
    async fn insert_product(&self, product: &Product) -> AppResult<()>;
    async fn update_product(&self, product: &Product) -> AppResult<bool>;
    /// Fails with a conflict while line items reference the product
    async fn delete_product(&self, id: Uuid) -> AppResult<bool>;
    /// `stock = max(0, stock + delta)`; false when the product does not exist
    async fn adjust_product_stock(&self, id: Uuid, delta: i32) -> AppResult<bool>;

    // Customers
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;
    async fn count_customers(&self) -> AppResult<u64>;
    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>>;
    async fn insert_customer(&self, customer: &Customer) -> AppResult<()>;
    async fn update_customer(&self, customer: &Customer) -> AppResult<bool>;
    /// Fails with a conflict while sales reference the customer
    async fn delete_customer(&self, id: Uuid) -> AppResult<bool>;
    /// `balance = max(0, balance + delta)`; false when the customer does not exist
    async fn adjust_customer_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool>;

    // Suppliers
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>>;
    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>>;
    async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<()>;
    async fn update_supplier(&self, supplier: &Supplier) -> AppResult<bool>;
    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool>;
    async fn adjust_supplier_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool>;

    // Sales
    async fn list_sales(&self) -> AppResult<Vec<Sale>>;
    async fn list_sales_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Sale>>;
    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>>;
    async fn list_sale_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>>;
    /// Write header and items, take stock out, and charge the customer the
    /// header total, atomically
    async fn create_sale(&self, sale: &SaleWithItems) -> AppResult<()>;
    async fn update_sale(&self, sale: &Sale) -> AppResult<bool>;
    /// Removes the items with the header
    async fn delete_sale(&self, id: Uuid) -> AppResult<bool>;

    // Purchases
    async fn list_purchases(&self) -> AppResult<Vec<Purchase>>;
    async fn list_purchases_for_supplier(&self, supplier_id: Uuid) -> AppResult<Vec<Purchase>>;
    async fn get_purchase(&self, id: Uuid) -> AppResult<Option<Purchase>>;
    async fn list_purchase_items(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseItem>>;
    /// Write header and items, put stock in, and credit the supplier the
    /// header total, atomically
    async fn create_purchase(&self, purchase: &PurchaseWithItems) -> AppResult<()>;
    async fn update_purchase(&self, purchase: &Purchase) -> AppResult<bool>;
    async fn delete_purchase(&self, id: Uuid) -> AppResult<bool>;

    // Expenses
    async fn list_expenses(&self) -> AppResult<Vec<Expense>>;
    async fn get_expense(&self, id: Uuid) -> AppResult<Option<Expense>>;
    async fn insert_expense(&self, expense: &Expense) -> AppResult<()>;
    async fn update_expense(&self, expense: &Expense) -> AppResult<bool>;
    async fn delete_expense(&self, id: Uuid) -> AppResult<bool>;

    // Staff
    async fn list_staff(&self) -> AppResult<Vec<StaffMember>>;
    async fn get_staff(&self, id: Uuid) -> AppResult<Option<StaffMember>>;
    async fn get_staff_by_username(&self, username: &str) -> AppResult<Option<StaffMember>>;
    async fn insert_staff(&self, member: &StaffMember) -> AppResult<()>;
    async fn update_staff(&self, member: &StaffMember) -> AppResult<bool>;
    async fn delete_staff(&self, id: Uuid) -> AppResult<bool>;
}
