//! PostgreSQL storage
//!
//! Stock and balance changes are single `GREATEST(0, x + $2)` statements, so
//! concurrent requests cannot lose each other's updates. Composite sale and
//! purchase creation runs inside one transaction; dropping the transaction on
//! any early return rolls everything back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{
    Category, CompanySettings, Customer, Expense, Product, Purchase, PurchaseItem,
    PurchaseWithItems, Sale, SaleItem, SaleWithItems, StaffMember, Supplier, DEFAULT_CATEGORIES,
};

use super::Storage;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PgStorage {
    db: PgPool,
}

impl PgStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

async fn exists(tx: &mut Transaction<'_, Postgres>, sql: &str, id: Uuid) -> AppResult<bool> {
    let found: bool = sqlx::query_scalar(sql).bind(id).fetch_one(&mut **tx).await?;
    Ok(found)
}

/// Clamped stock movement inside a document transaction
async fn move_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    delta: i32,
) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE products SET stock_quantity = GREATEST(0, stock_quantity + $2) WHERE id = $1",
    )
    .bind(product_id)
    .bind(delta)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Product {}", product_id)));
    }
    Ok(())
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let has_settings: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM company_settings)")
                .fetch_one(&mut *tx)
                .await?;
        if !has_settings {
            let settings = CompanySettings::default();
            sqlx::query(
                r#"
                INSERT INTO company_settings (id, company_name, vat_rate, tax_year,
                    auto_vat_calculation, include_vat_in_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(settings.id)
            .bind(&settings.company_name)
            .bind(settings.vat_rate)
            .bind(&settings.tax_year)
            .bind(settings.auto_vat_calculation)
            .bind(settings.include_vat_in_price)
            .execute(&mut *tx)
            .await?;
            tracing::info!("Seeded default company settings");
        }

        let category_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;
        if category_count == 0 {
            for (name, description) in DEFAULT_CATEGORIES {
                sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
                    .bind(Uuid::new_v4())
                    .bind(*name)
                    .bind(*description)
                    .execute(&mut *tx)
                    .await?;
            }
            tracing::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_company_settings(&self) -> AppResult<Option<CompanySettings>> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            "SELECT * FROM company_settings ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(&self.db)
        .await?;
        Ok(settings)
    }

    async fn save_company_settings(&self, s: &CompanySettings) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO company_settings (id, company_name, registration_number, address, phone,
                email, vat_number, pan_number, vat_rate, tax_year, auto_vat_calculation,
                include_vat_in_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                registration_number = EXCLUDED.registration_number,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                vat_number = EXCLUDED.vat_number,
                pan_number = EXCLUDED.pan_number,
                vat_rate = EXCLUDED.vat_rate,
                tax_year = EXCLUDED.tax_year,
                auto_vat_calculation = EXCLUDED.auto_vat_calculation,
                include_vat_in_price = EXCLUDED.include_vat_in_price,
                updated_at = NOW()
            "#,
        )
        .bind(s.id)
        .bind(&s.company_name)
        .bind(&s.registration_number)
        .bind(&s.address)
        .bind(&s.phone)
        .bind(&s.email)
        .bind(&s.vat_number)
        .bind(&s.pan_number)
        .bind(s.vat_rate)
        .bind(&s.tax_year)
        .bind(s.auto_vat_calculation)
        .bind(s.include_vat_in_price)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_category(&self, c: &Category) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, description, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.description)
        .bind(c.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_category(&self, c: &Category) -> AppResult<bool> {
        let result = sqlx::query("UPDATE categories SET name = $2, description = $3 WHERE id = $1")
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.description)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        // products.category_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn get_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE sku = $1")
            .bind(sku)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_product(&self, p: &Product) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, sku, category_id, description, unit_price, cost_price,
                stock_quantity, min_stock_level, unit, vat_applicable, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.sku)
        .bind(p.category_id)
        .bind(&p.description)
        .bind(p.unit_price)
        .bind(p.cost_price)
        .bind(p.stock_quantity)
        .bind(p.min_stock_level)
        .bind(&p.unit)
        .bind(p.vat_applicable)
        .bind(p.is_active)
        .bind(p.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_product(&self, p: &Product) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $2, sku = $3, category_id = $4, description = $5, unit_price = $6,
                cost_price = $7, min_stock_level = $8, unit = $9, vat_applicable = $10,
                is_active = $11
            WHERE id = $1
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.sku)
        .bind(p.category_id)
        .bind(&p.description)
        .bind(p.unit_price)
        .bind(p.cost_price)
        .bind(p.min_stock_level)
        .bind(&p.unit)
        .bind(p.vat_applicable)
        .bind(p.is_active)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;
        let referenced = exists(
            &mut tx,
            "SELECT EXISTS(SELECT 1 FROM sale_items WHERE product_id = $1)
                 OR EXISTS(SELECT 1 FROM purchase_items WHERE product_id = $1)",
            id,
        )
        .await?;
        if referenced {
            return Err(AppError::conflict(
                "product",
                "Product is used on sales or purchases and cannot be deleted",
            ));
        }
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_product_stock(&self, id: Uuid, delta: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET stock_quantity = GREATEST(0, stock_quantity + $2) WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_customers(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.db)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_customer(&self, c: &Customer) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, contact_person, email, phone, address, vat_number,
                pan_number, credit_limit, outstanding_balance, payment_terms, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.contact_person)
        .bind(&c.email)
        .bind(&c.phone)
        .bind(&c.address)
        .bind(&c.vat_number)
        .bind(&c.pan_number)
        .bind(c.credit_limit)
        .bind(c.outstanding_balance)
        .bind(&c.payment_terms)
        .bind(c.is_active)
        .bind(c.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_customer(&self, c: &Customer) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = $2, contact_person = $3, email = $4, phone = $5, address = $6,
                vat_number = $7, pan_number = $8, credit_limit = $9, payment_terms = $10,
                is_active = $11
            WHERE id = $1
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.contact_person)
        .bind(&c.email)
        .bind(&c.phone)
        .bind(&c.address)
        .bind(&c.vat_number)
        .bind(&c.pan_number)
        .bind(c.credit_limit)
        .bind(&c.payment_terms)
        .bind(c.is_active)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;
        if exists(
            &mut tx,
            "SELECT EXISTS(SELECT 1 FROM sales WHERE customer_id = $1)",
            id,
        )
        .await?
        {
            return Err(AppError::conflict(
                "customer",
                "Customer has sales and cannot be deleted",
            ));
        }
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_customer_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE customers SET outstanding_balance = GREATEST(0, outstanding_balance + $2) WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_supplier(&self, s: &Supplier) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact_person, email, phone, address, vat_number,
                pan_number, payment_terms, outstanding_balance, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.contact_person)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(&s.address)
        .bind(&s.vat_number)
        .bind(&s.pan_number)
        .bind(&s.payment_terms)
        .bind(s.outstanding_balance)
        .bind(s.is_active)
        .bind(s.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_supplier(&self, s: &Supplier) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = $2, contact_person = $3, email = $4, phone = $5, address = $6,
                vat_number = $7, pan_number = $8, payment_terms = $9, is_active = $10
            WHERE id = $1
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.contact_person)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(&s.address)
        .bind(&s.vat_number)
        .bind(&s.pan_number)
        .bind(&s.payment_terms)
        .bind(s.is_active)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;
        if exists(
            &mut tx,
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE supplier_id = $1)",
            id,
        )
        .await?
        {
            return Err(AppError::conflict(
                "supplier",
                "Supplier has purchases and cannot be deleted",
            ));
        }
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_supplier_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE suppliers SET outstanding_balance = GREATEST(0, outstanding_balance + $2) WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Sales
    // ------------------------------------------------------------------

    async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, Sale>("SELECT * FROM sales ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn list_sales_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE customer_id = $1 ORDER BY created_at",
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        let row = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_sale_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
        let rows = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = $1 ORDER BY position",
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_sale(&self, draft: &SaleWithItems) -> AppResult<()> {
        let sale = &draft.sale;
        let mut tx = self.db.begin().await?;

        if !exists(
            &mut tx,
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
            sale.customer_id,
        )
        .await?
        {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO sales (id, invoice_number, customer_id, sale_date, due_date, subtotal,
                vat_amount, total_amount, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(sale.id)
        .bind(&sale.invoice_number)
        .bind(sale.customer_id)
        .bind(sale.sale_date)
        .bind(sale.due_date)
        .bind(sale.subtotal)
        .bind(sale.vat_amount)
        .bind(sale.total_amount)
        .bind(sale.status)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in draft.items.iter().enumerate() {
            move_stock(&mut tx, item.product_id, -item.quantity).await?;
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, position, quantity, unit_price,
                    total_price, vat_rate, vat_amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.sale_id)
            .bind(item.product_id)
            .bind(position as i32)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .bind(item.vat_rate)
            .bind(item.vat_amount)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE customers SET outstanding_balance = GREATEST(0, outstanding_balance + $2) WHERE id = $1",
        )
        .bind(sale.customer_id)
        .bind(sale.total_amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_sale(&self, sale: &Sale) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sales SET status = $2, sale_date = $3, due_date = $4, notes = $5 WHERE id = $1",
        )
        .bind(sale.id)
        .bind(sale.status)
        .bind(sale.sale_date)
        .bind(sale.due_date)
        .bind(&sale.notes)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_sale(&self, id: Uuid) -> AppResult<bool> {
        // sale_items.sale_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, Purchase>("SELECT * FROM purchases ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn list_purchases_for_supplier(&self, supplier_id: Uuid) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE supplier_id = $1 ORDER BY created_at",
        )
        .bind(supplier_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_purchase(&self, id: Uuid) -> AppResult<Option<Purchase>> {
        let row = sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_purchase_items(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        let rows = sqlx::query_as::<_, PurchaseItem>(
            "SELECT * FROM purchase_items WHERE purchase_id = $1 ORDER BY position",
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_purchase(&self, draft: &PurchaseWithItems) -> AppResult<()> {
        let purchase = &draft.purchase;
        let mut tx = self.db.begin().await?;

        if !exists(
            &mut tx,
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
            purchase.supplier_id,
        )
        .await?
        {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO purchases (id, bill_number, supplier_id, purchase_date, due_date, subtotal,
                vat_amount, total_amount, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(purchase.id)
        .bind(&purchase.bill_number)
        .bind(purchase.supplier_id)
        .bind(purchase.purchase_date)
        .bind(purchase.due_date)
        .bind(purchase.subtotal)
        .bind(purchase.vat_amount)
        .bind(purchase.total_amount)
        .bind(purchase.status)
        .bind(&purchase.notes)
        .bind(purchase.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in draft.items.iter().enumerate() {
            move_stock(&mut tx, item.product_id, item.quantity).await?;
            sqlx::query(
                r#"
                INSERT INTO purchase_items (id, purchase_id, product_id, position, quantity,
                    unit_price, total_price, vat_rate, vat_amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.purchase_id)
            .bind(item.product_id)
            .bind(position as i32)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .bind(item.vat_rate)
            .bind(item.vat_amount)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE suppliers SET outstanding_balance = GREATEST(0, outstanding_balance + $2) WHERE id = $1",
        )
        .bind(purchase.supplier_id)
        .bind(purchase.total_amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_purchase(&self, purchase: &Purchase) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE purchases SET status = $2, purchase_date = $3, due_date = $4, notes = $5 WHERE id = $1",
        )
        .bind(purchase.id)
        .bind(purchase.status)
        .bind(purchase.purchase_date)
        .bind(purchase.due_date)
        .bind(&purchase.notes)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_purchase(&self, id: Uuid) -> AppResult<bool> {
        // purchase_items.purchase_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------

    async fn list_expenses(&self) -> AppResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>("SELECT * FROM expenses ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_expense(&self, id: Uuid) -> AppResult<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_expense(&self, e: &Expense) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, title, description, amount, category, expense_date,
                receipt_path, is_vat_applicable, vat_amount, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(e.id)
        .bind(&e.title)
        .bind(&e.description)
        .bind(e.amount)
        .bind(&e.category)
        .bind(e.expense_date)
        .bind(&e.receipt_path)
        .bind(e.is_vat_applicable)
        .bind(e.vat_amount)
        .bind(e.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_expense(&self, e: &Expense) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE expenses SET
                title = $2, description = $3, amount = $4, category = $5, expense_date = $6,
                receipt_path = $7, is_vat_applicable = $8, vat_amount = $9
            WHERE id = $1
            "#,
        )
        .bind(e.id)
        .bind(&e.title)
        .bind(&e.description)
        .bind(e.amount)
        .bind(&e.category)
        .bind(e.expense_date)
        .bind(&e.receipt_path)
        .bind(e.is_vat_applicable)
        .bind(e.vat_amount)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expense(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Staff
    // ------------------------------------------------------------------

    async fn list_staff(&self) -> AppResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffMember>("SELECT * FROM staff ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_staff(&self, id: Uuid) -> AppResult<Option<StaffMember>> {
        let row = sqlx::query_as::<_, StaffMember>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn get_staff_by_username(&self, username: &str) -> AppResult<Option<StaffMember>> {
        let row = sqlx::query_as::<_, StaffMember>("SELECT * FROM staff WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_staff(&self, m: &StaffMember) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, username, password_hash, full_name, email, phone, role,
                is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(m.id)
        .bind(&m.username)
        .bind(&m.password_hash)
        .bind(&m.full_name)
        .bind(&m.email)
        .bind(&m.phone)
        .bind(m.role)
        .bind(m.is_active)
        .bind(m.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_staff(&self, m: &StaffMember) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE staff SET
                username = $2, password_hash = $3, full_name = $4, email = $5, phone = $6,
                role = $7, is_active = $8
            WHERE id = $1
            "#,
        )
        .bind(m.id)
        .bind(&m.username)
        .bind(&m.password_hash)
        .bind(&m.full_name)
        .bind(&m.email)
        .bind(&m.phone)
        .bind(m.role)
        .bind(m.is_active)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_staff(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
