//! Company and tax settings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{empty_string_as_none, DEFAULT_VAT_RATE};

/// Fiscal year label used until the company sets its own (Bikram Sambat)
pub const DEFAULT_TAX_YEAR: &str = "2080-81";

pub const DEFAULT_COMPANY_NAME: &str = "Your Company Name";

/// The single company settings record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub id: Uuid,
    pub company_name: String,
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vat_number: Option<String>,
    pub pan_number: Option<String>,
    pub vat_rate: Decimal,
    pub tax_year: String,
    pub auto_vat_calculation: bool,
    pub include_vat_in_price: bool,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            registration_number: None,
            address: None,
            phone: None,
            email: None,
            vat_number: None,
            pan_number: None,
            vat_rate: DEFAULT_VAT_RATE,
            tax_year: DEFAULT_TAX_YEAR.to_string(),
            auto_vat_calculation: true,
            include_vat_in_price: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanySettingsInput {
    #[validate(length(min = 1, max = 200, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub registration_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub vat_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub pan_number: Option<String>,
    pub vat_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tax_year: Option<String>,
    pub auto_vat_calculation: Option<bool>,
    pub include_vat_in_price: Option<bool>,
}

impl CompanySettings {
    pub fn apply(&mut self, update: UpdateCompanySettingsInput) {
        if let Some(v) = update.company_name {
            self.company_name = v;
        }
        if let Some(v) = update.registration_number {
            self.registration_number = Some(v);
        }
        if let Some(v) = update.address {
            self.address = Some(v);
        }
        if let Some(v) = update.phone {
            self.phone = Some(v);
        }
        if let Some(v) = update.email {
            self.email = Some(v);
        }
        if let Some(v) = update.vat_number {
            self.vat_number = Some(v);
        }
        if let Some(v) = update.pan_number {
            self.pan_number = Some(v);
        }
        if let Some(v) = update.vat_rate {
            self.vat_rate = v;
        }
        if let Some(v) = update.tax_year {
            self.tax_year = v;
        }
        if let Some(v) = update.auto_vat_calculation {
            self.auto_vat_calculation = v;
        }
        if let Some(v) = update.include_vat_in_price {
            self.include_vat_in_price = v;
        }
    }
}
