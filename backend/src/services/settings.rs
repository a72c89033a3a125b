//! Company settings service

use std::sync::Arc;

use shared::models::{CompanySettings, UpdateCompanySettingsInput};
use shared::validation::{validate_pan_number, validate_tax_year, validate_vat_rate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn Storage>,
}

impl SettingsService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current settings; the defaults are stored on first read if seeding was skipped
    pub async fn get(&self) -> AppResult<CompanySettings> {
        if let Some(settings) = self.storage.get_company_settings().await? {
            return Ok(settings);
        }
        let settings = CompanySettings::default();
        self.storage.save_company_settings(&settings).await?;
        Ok(settings)
    }

    pub async fn update(&self, input: UpdateCompanySettingsInput) -> AppResult<CompanySettings> {
        input.validate()?;
        if let Some(rate) = input.vat_rate {
            validate_vat_rate(rate).map_err(|m| AppError::validation("vatRate", m))?;
        }
        if let Some(tax_year) = &input.tax_year {
            validate_tax_year(tax_year).map_err(|m| AppError::validation("taxYear", m))?;
        }
        if let Some(pan) = &input.pan_number {
            validate_pan_number(pan).map_err(|m| AppError::validation("panNumber", m))?;
        }

        let mut settings = self.get().await?;
        settings.apply(input);
        self.storage.save_company_settings(&settings).await?;

        tracing::info!(company = %settings.company_name, "Company settings updated");
        Ok(settings)
    }
}
