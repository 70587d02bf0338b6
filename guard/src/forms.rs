//! Dashboard form schemas
//!
//! Each form has a lazily built, process-wide [`Schema`] and a typed struct
//! it deserializes into once validation succeeds.

use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FieldError, ValidationErrors, ValidationResult};
use crate::messages::{ErrorCode, Locale, Message};
use crate::sanitizers::sanitize_value;
use crate::schema::{EnumRule, NumberRule, ObjectRule, Schema, SchemaExt, StringRule};
use crate::validators::{has_digit, has_letter, is_hex_color, is_valid_cep, is_valid_cnpj};

// ─────────────────────────────────────────────────────────────────────────────
// Constants for validation rules
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum password length accepted at login
const LOGIN_PASSWORD_MIN: usize = 6;
/// Minimum password length for new or changed passwords
const STRONG_PASSWORD_MIN: usize = 8;
/// Minimum length for person names
const PERSON_NAME_MIN: usize = 2;
/// Minimum length for voucher codes, voucher names and location names
const LABEL_MIN: usize = 3;
/// Minimum length for street addresses
const ADDRESS_MIN: usize = 5;
/// Brazilian state abbreviations (UF) are two letters
const STATE_LENGTH: usize = 2;
/// Country assumed when a location omits it
pub const DEFAULT_COUNTRY: &str = "Brasil";

fn strong_password() -> StringRule {
    StringRule::new()
        .min(STRONG_PASSWORD_MIN)
        .refine(has_letter, Message::PasswordNeedsLetter)
        .refine(has_digit, Message::PasswordNeedsDigit)
}

lazy_static! {
    pub static ref LOGIN_SCHEMA: Schema = ObjectRule::new()
        .field("email", StringRule::new().email())
        .field("password", StringRule::new().min(LOGIN_PASSWORD_MIN))
        .into();

    pub static ref REGISTER_SCHEMA: Schema = ObjectRule::new()
        .field("name", StringRule::new().min(PERSON_NAME_MIN))
        .field("email", StringRule::new().email())
        .field("password", strong_password())
        .into();

    pub static ref VOUCHER_SCHEMA: Schema = ObjectRule::new()
        .field("code", StringRule::new().min(LABEL_MIN))
        .field("name", StringRule::new().min(LABEL_MIN))
        .field("description", StringRule::new().optional())
        .field("type", EnumRule::new(["percentage", "fixed_amount", "per_unit"]))
        .field("value", NumberRule::new().coerce().positive())
        .field("is_active", Schema::Boolean.with_default(true))
        .field("start_date", StringRule::new().optional())
        .field("end_date", StringRule::new().optional())
        .field(
            "total_quantity",
            NumberRule::new().coerce().int().nullable().optional(),
        )
        .into();

    pub static ref USER_SCHEMA: Schema = ObjectRule::new()
        .field("name", StringRule::new().min(PERSON_NAME_MIN))
        .field("email", StringRule::new().email())
        .field("password", strong_password().optional())
        .field("role", EnumRule::new(["admin", "operator", "regular"]))
        .into();

    pub static ref LOCATION_SCHEMA: Schema = ObjectRule::new()
        .field("name", StringRule::new().min(LABEL_MIN))
        .field("address", StringRule::new().min(ADDRESS_MIN))
        .field("postal_code", StringRule::new().refine(is_valid_cep, Message::InvalidCep))
        .field("city", StringRule::new().min(PERSON_NAME_MIN))
        .field("state", StringRule::new().length(STATE_LENGTH))
        .field("country", StringRule::new().with_default(DEFAULT_COUNTRY))
        .field(
            "latitude",
            NumberRule::new().coerce().min(-90.0).max(90.0).optional(),
        )
        .field(
            "longitude",
            NumberRule::new().coerce().min(-180.0).max(180.0).optional(),
        )
        .field(
            "cnpj",
            StringRule::new()
                .allow_empty()
                .refine(is_valid_cnpj, Message::InvalidCnpj)
                .optional(),
        )
        .field("phone", StringRule::new().optional())
        .field(
            "background_color",
            StringRule::new().refine(is_hex_color, Message::InvalidColor),
        )
        .field(
            "price_per_kwh",
            NumberRule::new().coerce().positive().optional(),
        )
        .into();
}

/// A form payload with a schema of its own
pub trait Validatable: DeserializeOwned {
    fn schema() -> &'static Schema;

    /// Validate and convert a raw payload
    fn parse(value: &Value) -> ValidationResult<Self> {
        Self::parse_with(value, Locale::default())
    }

    fn parse_with(value: &Value, locale: Locale) -> ValidationResult<Self> {
        Self::schema().parse_with(value, locale)
    }

    /// Validate, strip markup from every string, then convert
    fn parse_sanitized(value: &Value, locale: Locale) -> ValidationResult<Self> {
        let mut normalized = Self::schema().validate_with(value, locale)?;
        sanitize_value(&mut normalized);
        serde_json::from_value(normalized).map_err(|e| {
            ValidationErrors::single(FieldError::new("", ErrorCode::InvalidType, e.to_string()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validatable for LoginForm {
    fn schema() -> &'static Schema {
        &LOGIN_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validatable for RegisterForm {
    fn schema() -> &'static Schema {
        &REGISTER_SCHEMA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    Percentage,
    FixedAmount,
    PerUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherForm {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: VoucherType,
    pub value: f64,
    pub is_active: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_quantity: Option<i64>,
}

impl Validatable for VoucherForm {
    fn schema() -> &'static Schema {
        &VOUCHER_SCHEMA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Operator,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: UserRole,
}

impl Validatable for UserForm {
    fn schema() -> &'static Schema {
        &USER_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationForm {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub background_color: String,
    pub price_per_kwh: Option<f64>,
}

impl Validatable for LocationForm {
    fn schema() -> &'static Schema {
        &LOCATION_SCHEMA
    }
}
