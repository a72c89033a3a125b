//! Business logic services for Khata

pub mod category;
pub mod expense;
pub mod party;
pub mod product;
pub mod purchase;
pub mod reporting;
pub mod sale;
pub mod settings;
pub mod staff;

pub use category::CategoryService;
pub use expense::ExpenseService;
pub use party::{CustomerService, SupplierService};
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use settings::SettingsService;
pub use staff::StaffService;
