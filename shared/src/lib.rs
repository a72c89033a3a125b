//! Shared types and domain logic for Khata
//!
//! This crate holds everything that must behave identically on the server and
//! in the browser (via WASM): the entity models, VAT and invoice arithmetic,
//! document numbering, and the dashboard/report aggregations.

pub mod models;
pub mod money;
pub mod numbering;
pub mod pricing;
pub mod reports;
pub mod types;
pub mod validation;

pub use models::*;
pub use money::*;
pub use numbering::*;
pub use pricing::*;
pub use reports::*;
pub use types::*;
pub use validation::*;
