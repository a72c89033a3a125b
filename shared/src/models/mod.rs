//! Domain models for Khata

mod category;
mod expense;
mod party;
mod product;
mod purchase;
mod sale;
mod settings;
mod staff;

pub use category::*;
pub use expense::*;
pub use party::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use settings::*;
pub use staff::*;
