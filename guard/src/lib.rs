//! Input guard for the CSMS dashboard
//!
//! Sanitization and schema validation applied to every form payload before
//! it reaches the REST backend, and to API text before it is re-rendered.
//!
//! 1. **Sanitizers** - strip markup from strings and whole JSON values
//! 2. **Validators** - format predicates (email, CEP, CNPJ, phone) and the URL guard
//! 3. **Schemas** - composable rules producing localized field errors
//! 4. **Forms / commands** - the dashboard's entity and remote-command schemas

pub mod commands;
pub mod config;
pub mod errors;
pub mod forms;
pub mod messages;
pub mod sanitizers;
pub mod schema;
pub mod validators;

pub use commands::{RemoteCommand, COMMAND_SCHEMA};
pub use config::{ConfigError, GuardConfig};
pub use errors::{FieldError, ValidationBuilder, ValidationErrors, ValidationReport, ValidationResult};
pub use forms::{
    LocationForm, LoginForm, RegisterForm, UserForm, Validatable, VoucherForm, LOCATION_SCHEMA,
    LOGIN_SCHEMA, REGISTER_SCHEMA, USER_SCHEMA, VOUCHER_SCHEMA,
};
pub use messages::{ErrorCode, Locale, Message};
pub use sanitizers::{check_depth, escape_html, sanitize_html, sanitize_object, sanitize_value};
pub use schema::{Schema, SchemaExt};
pub use validators::{
    is_strong_password, is_valid_cep, is_valid_cnpj, is_valid_email, is_valid_phone,
    sanitize_phone, sanitize_url,
};
