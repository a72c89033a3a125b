//! HTTP handlers for Khata
//!
//! Handlers stay thin: extract, call a service, wrap the result.

use serde::Serialize;

pub mod category;
pub mod expense;
pub mod health;
pub mod party;
pub mod product;
pub mod purchase;
pub mod reporting;
pub mod sale;
pub mod settings;
pub mod staff;

pub use category::*;
pub use expense::*;
pub use health::*;
pub use party::*;
pub use product::*;
pub use purchase::*;
pub use reporting::*;
pub use sale::*;
pub use settings::*;
pub use staff::*;

/// Body returned by every delete endpoint
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
