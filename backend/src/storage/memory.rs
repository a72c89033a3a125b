//! In-memory storage
//!
//! Backs development runs and the test suite. All state lives behind one
//! `RwLock`, so every operation, including composite sale and purchase
//! creation, is atomic with respect to every other.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{
    clamp_balance, clamp_stock, Category, CompanySettings, CreateCategoryInput, Customer,
    Expense, Product, Purchase, PurchaseItem, PurchaseWithItems, Sale, SaleItem, SaleWithItems,
    StaffMember, Supplier, DEFAULT_CATEGORIES,
};

use super::Storage;
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct MemState {
    settings: Option<CompanySettings>,
    categories: Vec<Category>,
    products: Vec<Product>,
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
    sales: Vec<Sale>,
    sale_items: Vec<SaleItem>,
    purchases: Vec<Purchase>,
    purchase_items: Vec<PurchaseItem>,
    expenses: Vec<Expense>,
    staff: Vec<StaffMember>,
}

/// Records are kept in insertion order, matching `ORDER BY created_at`.
#[derive(Debug, Default)]
pub struct MemStorage {
    state: RwLock<MemState>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, MemState>> {
        self.state
            .read()
            .map_err(|_| AppError::StorageError("lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, MemState>> {
        self.state
            .write()
            .map_err(|_| AppError::StorageError("lock poisoned".to_string()))
    }
}

fn find<T, F>(rows: &[T], pred: F) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    rows.iter().find(|r| pred(r)).cloned()
}

/// Replace the row with the same id; false when there is none
fn replace<T, F>(rows: &mut [T], pred: F, apply: impl FnOnce(&mut T)) -> bool
where
    F: Fn(&T) -> bool,
{
    match rows.iter_mut().find(|r| pred(r)) {
        Some(row) => {
            apply(row);
            true
        }
        None => false,
    }
}

fn remove<T, F>(rows: &mut Vec<T>, pred: F) -> bool
where
    F: Fn(&T) -> bool,
{
    let before = rows.len();
    rows.retain(|r| !pred(r));
    rows.len() != before
}

fn check_stock_targets<'a>(
    state: &MemState,
    product_ids: impl Iterator<Item = &'a Uuid>,
) -> AppResult<()> {
    for product_id in product_ids {
        if !state.products.iter().any(|p| p.id == *product_id) {
            return Err(AppError::NotFound(format!("Product {}", product_id)));
        }
    }
    Ok(())
}

/// Balance after `delta`, rejected instead of overflowing
fn next_balance(current: Decimal, delta: Decimal, field: &str) -> AppResult<Decimal> {
    clamp_balance(current, delta)
        .ok_or_else(|| AppError::validation(field, "Balance would exceed the supported range"))
}

fn move_stock(state: &mut MemState, product_id: Uuid, delta: i32) {
    if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
        product.stock_quantity = clamp_stock(product.stock_quantity, delta);
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        let mut state = self.write()?;
        if state.settings.is_none() {
            state.settings = Some(CompanySettings::default());
        }
        if state.categories.is_empty() {
            for (name, description) in DEFAULT_CATEGORIES {
                state.categories.push(Category::new(CreateCategoryInput {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                }));
            }
        }
        Ok(())
    }

    async fn get_company_settings(&self) -> AppResult<Option<CompanySettings>> {
        Ok(self.read()?.settings.clone())
    }

    async fn save_company_settings(&self, settings: &CompanySettings) -> AppResult<()> {
        self.write()?.settings = Some(settings.clone());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.read()?.categories.clone())
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(find(&self.read()?.categories, |c| c.id == id))
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        self.write()?.categories.push(category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.categories, |c| c.id == category.id, |c| {
            *c = category.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        if !remove(&mut state.categories, |c| c.id == id) {
            return Ok(false);
        }
        for product in state.products.iter_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.read()?.products.clone())
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(find(&self.read()?.products, |p| p.id == id))
    }

    async fn get_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        Ok(find(&self.read()?.products, |p| p.sku == sku))
    }

    async fn insert_product(&self, product: &Product) -> AppResult<()> {
        let mut state = self.write()?;
        if state.products.iter().any(|p| p.sku == product.sku) {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }
        if let Some(category_id) = product.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }
        state.products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> AppResult<bool> {
        let mut state = self.write()?;
        if state
            .products
            .iter()
            .any(|p| p.sku == product.sku && p.id != product.id)
        {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }
        if let Some(category_id) = product.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }
        Ok(replace(&mut state.products, |p| p.id == product.id, |p| {
            let stock = p.stock_quantity;
            *p = product.clone();
            p.stock_quantity = stock;
        }))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        let referenced = state.sale_items.iter().any(|i| i.product_id == id)
            || state.purchase_items.iter().any(|i| i.product_id == id);
        if referenced {
            return Err(AppError::conflict(
                "product",
                "Product is used on sales or purchases and cannot be deleted",
            ));
        }
        Ok(remove(&mut state.products, |p| p.id == id))
    }

    async fn adjust_product_stock(&self, id: Uuid, delta: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.products, |p| p.id == id, |p| {
            p.stock_quantity = clamp_stock(p.stock_quantity, delta)
        }))
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.read()?.customers.clone())
    }

    async fn count_customers(&self) -> AppResult<u64> {
        Ok(self.read()?.customers.len() as u64)
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(find(&self.read()?.customers, |c| c.id == id))
    }

    async fn insert_customer(&self, customer: &Customer) -> AppResult<()> {
        self.write()?.customers.push(customer.clone());
        Ok(())
    }

    async fn update_customer(&self, customer: &Customer) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.customers, |c| c.id == customer.id, |c| {
            let balance = c.outstanding_balance;
            *c = customer.clone();
            c.outstanding_balance = balance;
        }))
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        if state.sales.iter().any(|s| s.customer_id == id) {
            return Err(AppError::conflict(
                "customer",
                "Customer has sales and cannot be deleted",
            ));
        }
        Ok(remove(&mut state.customers, |c| c.id == id))
    }

    async fn adjust_customer_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool> {
        let mut state = self.write()?;
        let Some(customer) = state.customers.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        customer.outstanding_balance = next_balance(customer.outstanding_balance, delta, "delta")?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        Ok(self.read()?.suppliers.clone())
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        Ok(find(&self.read()?.suppliers, |s| s.id == id))
    }

    async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<()> {
        self.write()?.suppliers.push(supplier.clone());
        Ok(())
    }

    async fn update_supplier(&self, supplier: &Supplier) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.suppliers, |s| s.id == supplier.id, |s| {
            let balance = s.outstanding_balance;
            *s = supplier.clone();
            s.outstanding_balance = balance;
        }))
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        if state.purchases.iter().any(|p| p.supplier_id == id) {
            return Err(AppError::conflict(
                "supplier",
                "Supplier has purchases and cannot be deleted",
            ));
        }
        Ok(remove(&mut state.suppliers, |s| s.id == id))
    }

    async fn adjust_supplier_balance(&self, id: Uuid, delta: Decimal) -> AppResult<bool> {
        let mut state = self.write()?;
        let Some(supplier) = state.suppliers.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        supplier.outstanding_balance = next_balance(supplier.outstanding_balance, delta, "delta")?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Sales
    // ------------------------------------------------------------------

    async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        Ok(self.read()?.sales.clone())
    }

    async fn list_sales_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Sale>> {
        let state = self.read()?;
        Ok(state
            .sales
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        Ok(find(&self.read()?.sales, |s| s.id == id))
    }

    async fn list_sale_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
        let state = self.read()?;
        Ok(state
            .sale_items
            .iter()
            .filter(|i| i.sale_id == sale_id)
            .cloned()
            .collect())
    }

    async fn create_sale(&self, draft: &SaleWithItems) -> AppResult<()> {
        let mut state = self.write()?;
        let sale = &draft.sale;

        // Every check runs before the first write
        if state
            .sales
            .iter()
            .any(|s| s.invoice_number == sale.invoice_number)
        {
            return Err(AppError::DuplicateEntry("invoiceNumber".to_string()));
        }
        let Some(customer) = state.customers.iter().find(|c| c.id == sale.customer_id) else {
            return Err(AppError::NotFound("Customer".to_string()));
        };
        let balance = next_balance(
            customer.outstanding_balance,
            sale.total_amount,
            "totalAmount",
        )?;
        check_stock_targets(&state, draft.items.iter().map(|i| &i.product_id))?;

        state.sales.push(sale.clone());
        for item in &draft.items {
            state.sale_items.push(item.clone());
            move_stock(&mut state, item.product_id, -item.quantity);
        }
        if let Some(customer) = state.customers.iter_mut().find(|c| c.id == sale.customer_id) {
            customer.outstanding_balance = balance;
        }
        Ok(())
    }

    async fn update_sale(&self, sale: &Sale) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.sales, |s| s.id == sale.id, |s| {
            *s = sale.clone()
        }))
    }

    async fn delete_sale(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        if !remove(&mut state.sales, |s| s.id == id) {
            return Ok(false);
        }
        state.sale_items.retain(|i| i.sale_id != id);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        Ok(self.read()?.purchases.clone())
    }

    async fn list_purchases_for_supplier(&self, supplier_id: Uuid) -> AppResult<Vec<Purchase>> {
        let state = self.read()?;
        Ok(state
            .purchases
            .iter()
            .filter(|p| p.supplier_id == supplier_id)
            .cloned()
            .collect())
    }

    async fn get_purchase(&self, id: Uuid) -> AppResult<Option<Purchase>> {
        Ok(find(&self.read()?.purchases, |p| p.id == id))
    }

    async fn list_purchase_items(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        let state = self.read()?;
        Ok(state
            .purchase_items
            .iter()
            .filter(|i| i.purchase_id == purchase_id)
            .cloned()
            .collect())
    }

    async fn create_purchase(&self, draft: &PurchaseWithItems) -> AppResult<()> {
        let mut state = self.write()?;
        let purchase = &draft.purchase;

        if state
            .purchases
            .iter()
            .any(|p| p.bill_number == purchase.bill_number)
        {
            return Err(AppError::DuplicateEntry("billNumber".to_string()));
        }
        let Some(supplier) = state
            .suppliers
            .iter()
            .find(|s| s.id == purchase.supplier_id)
        else {
            return Err(AppError::NotFound("Supplier".to_string()));
        };
        let balance = next_balance(
            supplier.outstanding_balance,
            purchase.total_amount,
            "totalAmount",
        )?;
        check_stock_targets(&state, draft.items.iter().map(|i| &i.product_id))?;

        state.purchases.push(purchase.clone());
        for item in &draft.items {
            state.purchase_items.push(item.clone());
            move_stock(&mut state, item.product_id, item.quantity);
        }
        if let Some(supplier) = state
            .suppliers
            .iter_mut()
            .find(|s| s.id == purchase.supplier_id)
        {
            supplier.outstanding_balance = balance;
        }
        Ok(())
    }

    async fn update_purchase(&self, purchase: &Purchase) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.purchases, |p| p.id == purchase.id, |p| {
            *p = purchase.clone()
        }))
    }

    async fn delete_purchase(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.write()?;
        if !remove(&mut state.purchases, |p| p.id == id) {
            return Ok(false);
        }
        state.purchase_items.retain(|i| i.purchase_id != id);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------

    async fn list_expenses(&self) -> AppResult<Vec<Expense>> {
        Ok(self.read()?.expenses.clone())
    }

    async fn get_expense(&self, id: Uuid) -> AppResult<Option<Expense>> {
        Ok(find(&self.read()?.expenses, |e| e.id == id))
    }

    async fn insert_expense(&self, expense: &Expense) -> AppResult<()> {
        self.write()?.expenses.push(expense.clone());
        Ok(())
    }

    async fn update_expense(&self, expense: &Expense) -> AppResult<bool> {
        let mut state = self.write()?;
        Ok(replace(&mut state.expenses, |e| e.id == expense.id, |e| {
            *e = expense.clone()
        }))
    }

    async fn delete_expense(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&mut self.write()?.expenses, |e| e.id == id))
    }

    // ------------------------------------------------------------------
    // Staff
    // ------------------------------------------------------------------

    async fn list_staff(&self) -> AppResult<Vec<StaffMember>> {
        Ok(self.read()?.staff.clone())
    }

    async fn get_staff(&self, id: Uuid) -> AppResult<Option<StaffMember>> {
        Ok(find(&self.read()?.staff, |m| m.id == id))
    }

    async fn get_staff_by_username(&self, username: &str) -> AppResult<Option<StaffMember>> {
        Ok(find(&self.read()?.staff, |m| m.username == username))
    }

    async fn insert_staff(&self, member: &StaffMember) -> AppResult<()> {
        let mut state = self.write()?;
        if state.staff.iter().any(|m| m.username == member.username) {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }
        state.staff.push(member.clone());
        Ok(())
    }

    async fn update_staff(&self, member: &StaffMember) -> AppResult<bool> {
        let mut state = self.write()?;
        if state
            .staff
            .iter()
            .any(|m| m.username == member.username && m.id != member.id)
        {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }
        Ok(replace(&mut state.staff, |m| m.id == member.id, |m| {
            *m = member.clone()
        }))
    }

    async fn delete_staff(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&mut self.write()?.staff, |m| m.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CreateCustomerInput, ContactInput};

    fn customer() -> Customer {
        Customer::new(CreateCustomerInput {
            name: "Bhandari Stores".into(),
            contact: ContactInput::default(),
            credit_limit: None,
            is_active: None,
        })
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemStorage::new();
        store.seed_defaults().await.unwrap();
        store.seed_defaults().await.unwrap();
        assert_eq!(store.list_categories().await.unwrap().len(), 4);
        assert!(store.get_company_settings().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn overflowing_adjustment_is_rejected_and_store_stays_usable() {
        let store = MemStorage::new();
        let c = customer();
        store.insert_customer(&c).await.unwrap();
        store
            .adjust_customer_balance(c.id, Decimal::from(10))
            .await
            .unwrap();

        let err = store
            .adjust_customer_balance(c.id, Decimal::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "delta"));

        let stored = store.get_customer(c.id).await.unwrap().unwrap();
        assert_eq!(stored.outstanding_balance, Decimal::from(10));
        assert!(store.ping().await.is_ok());
        assert!(store
            .adjust_customer_balance(c.id, Decimal::ONE)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn update_does_not_touch_balance() {
        let store = MemStorage::new();
        let mut c = customer();
        store.insert_customer(&c).await.unwrap();
        assert!(store
            .adjust_customer_balance(c.id, Decimal::from(40))
            .await
            .unwrap());

        c.name = "Renamed".into();
        c.outstanding_balance = Decimal::ZERO;
        store.update_customer(&c).await.unwrap();

        let stored = store.get_customer(c.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.outstanding_balance, Decimal::from(40));
    }

    #[tokio::test]
    async fn adjusting_missing_entities_reports_false() {
        let store = MemStorage::new();
        assert!(!store.adjust_product_stock(Uuid::new_v4(), 3).await.unwrap());
        assert!(!store
            .adjust_supplier_balance(Uuid::new_v4(), Decimal::ONE)
            .await
            .unwrap());
    }
}
