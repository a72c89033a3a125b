//! Customers and suppliers
//!
//! Both carry an outstanding balance: the running total invoiced to a customer
//! or billed by a supplier, less recorded payments, never below zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::empty_string_as_none;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vat_number: Option<String>,
    pub pan_number: Option<String>,
    pub credit_limit: Decimal,
    pub outstanding_balance: Decimal,
    pub payment_terms: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vat_number: Option<String>,
    pub pan_number: Option<String>,
    pub payment_terms: Option<String>,
    pub outstanding_balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Contact details common to customers and suppliers
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub vat_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub pan_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub name: String,
    #[serde(flatten)]
    #[validate]
    pub contact: ContactInput,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerInput {
    #[validate(length(min = 1, max = 200, message = "Customer name cannot be empty"))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate]
    pub contact: ContactInput,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 200, message = "Supplier name is required"))]
    pub name: String,
    #[serde(flatten)]
    #[validate]
    pub contact: ContactInput,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierInput {
    #[validate(length(min = 1, max = 200, message = "Supplier name cannot be empty"))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate]
    pub contact: ContactInput,
    pub is_active: Option<bool>,
}

/// Apply a signed delta to an outstanding balance, flooring at zero.
/// `None` when the sum overflows.
pub fn clamp_balance(current: Decimal, delta: Decimal) -> Option<Decimal> {
    current
        .checked_add(delta)
        .map(|balance| balance.max(Decimal::ZERO))
}

macro_rules! merge_contact {
    ($target:expr, $contact:expr) => {{
        let contact = $contact;
        if let Some(v) = contact.contact_person {
            $target.contact_person = Some(v);
        }
        if let Some(v) = contact.email {
            $target.email = Some(v);
        }
        if let Some(v) = contact.phone {
            $target.phone = Some(v);
        }
        if let Some(v) = contact.address {
            $target.address = Some(v);
        }
        if let Some(v) = contact.vat_number {
            $target.vat_number = Some(v);
        }
        if let Some(v) = contact.pan_number {
            $target.pan_number = Some(v);
        }
        if let Some(v) = contact.payment_terms {
            $target.payment_terms = Some(v);
        }
    }};
}

impl Customer {
    pub fn new(input: CreateCustomerInput) -> Self {
        let c = input.contact;
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            contact_person: c.contact_person,
            email: c.email,
            phone: c.phone,
            address: c.address,
            vat_number: c.vat_number,
            pan_number: c.pan_number,
            credit_limit: input.credit_limit.unwrap_or(Decimal::ZERO),
            outstanding_balance: Decimal::ZERO,
            payment_terms: c.payment_terms,
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: UpdateCustomerInput) {
        if let Some(name) = update.name {
            self.name = name;
        }
        merge_contact!(self, update.contact);
        if let Some(limit) = update.credit_limit {
            self.credit_limit = limit;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
    }

    /// Whether the balance exceeds a non-zero credit limit
    pub fn is_over_credit_limit(&self) -> bool {
        self.credit_limit > Decimal::ZERO && self.outstanding_balance > self.credit_limit
    }
}

impl Supplier {
    pub fn new(input: CreateSupplierInput) -> Self {
        let c = input.contact;
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            contact_person: c.contact_person,
            email: c.email,
            phone: c.phone,
            address: c.address,
            vat_number: c.vat_number,
            pan_number: c.pan_number,
            payment_terms: c.payment_terms,
            outstanding_balance: Decimal::ZERO,
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: UpdateSupplierInput) {
        if let Some(name) = update.name {
            self.name = name;
        }
        merge_contact!(self, update.contact);
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
    }
}
