//! Declarative validation schemas
//!
//! A [`Schema`] is an immutable tree of rules built once and shared. It
//! checks a JSON value, collecting every field error it can find, and on
//! success returns the normalized value (defaults filled in, numeric text
//! coerced where the rule allows it).
//!
//! ```
//! use csms_guard::schema::{ObjectRule, Schema, SchemaExt, StringRule, NumberRule};
//! use serde_json::json;
//!
//! let schema: Schema = ObjectRule::new()
//!     .field("name", StringRule::new().min(3))
//!     .field("power", NumberRule::new().coerce().positive().optional())
//!     .into();
//!
//! let value = schema.validate(&json!({"name": "Wallbox", "power": "22"})).unwrap();
//! assert_eq!(value, json!({"name": "Wallbox", "power": 22}));
//! ```

mod rules;

pub use rules::{
    DiscriminatedUnion, EnumRule, NumberCheck, NumberConstraint, NumberRule, ObjectRule,
    StringCheck, StringConstraint, StringRule,
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::{FieldError, ValidationBuilder, ValidationErrors, ValidationResult};
use crate::messages::{ErrorCode, Locale, Message};

/// A node of a validation schema
#[derive(Debug, Clone)]
pub enum Schema {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Enum(EnumRule),
    Object(ObjectRule),
    Array(Box<Schema>),
    Union(DiscriminatedUnion),
    /// Absence is accepted and the inner rule is not run
    Optional(Box<Schema>),
    /// Explicit `null` is accepted
    Nullable(Box<Schema>),
    /// The given value is used when the field is absent
    WithDefault(Box<Schema>, Value),
}

impl Schema {
    pub fn array(items: impl Into<Schema>) -> Self {
        Schema::Array(Box::new(items.into()))
    }

    pub fn validate(&self, value: &Value) -> ValidationResult<Value> {
        self.validate_with(value, Locale::default())
    }

    pub fn validate_with(&self, value: &Value, locale: Locale) -> ValidationResult<Value> {
        let mut errors = ValidationBuilder::new(locale);
        let output = self.check(Some(value), "", &mut errors);
        if errors.has_errors() {
            debug!(errors = errors.error_count(), "validation failed");
        }
        errors.finish(output.unwrap_or(Value::Null))
    }

    /// Validate, then deserialize the normalized value into `T`
    pub fn parse<T: DeserializeOwned>(&self, value: &Value) -> ValidationResult<T> {
        self.parse_with(value, Locale::default())
    }

    pub fn parse_with<T: DeserializeOwned>(&self, value: &Value, locale: Locale) -> ValidationResult<T> {
        let normalized = self.validate_with(value, locale)?;
        serde_json::from_value(normalized).map_err(|e| {
            ValidationErrors::single(FieldError::new("", ErrorCode::InvalidType, e.to_string()))
        })
    }

    /// Check a possibly absent value at `path`.
    ///
    /// `None` in the return means the field is omitted from the output,
    /// either because it was absent and optional or because it failed.
    pub(crate) fn check(
        &self,
        value: Option<&Value>,
        path: &str,
        errors: &mut ValidationBuilder,
    ) -> Option<Value> {
        match (self, value) {
            (Schema::Optional(_), None) => None,
            (Schema::Optional(inner), present) => inner.check(present, path, errors),
            (Schema::WithDefault(inner, default), None) => inner.check(Some(default), path, errors),
            (Schema::WithDefault(inner, _), present) => inner.check(present, path, errors),
            (Schema::Nullable(_), Some(Value::Null)) => Some(Value::Null),
            (Schema::Nullable(inner), other) => inner.check(other, path, errors),
            (_, None | Some(Value::Null)) => {
                errors.add(path, &Message::Required);
                None
            }
            (Schema::String(rule), Some(v)) => rule.check(v, path, errors),
            (Schema::Number(rule), Some(v)) => rule.check(v, path, errors),
            (Schema::Boolean, Some(v)) => {
                if v.is_boolean() {
                    Some(v.clone())
                } else {
                    errors.add(path, &Message::ExpectedBoolean);
                    None
                }
            }
            (Schema::Enum(rule), Some(v)) => rule.check(v, path, errors),
            (Schema::Object(rule), Some(v)) => rule.check(v, path, errors),
            (Schema::Union(rule), Some(v)) => rule.check(v, path, errors),
            (Schema::Array(items), Some(v)) => {
                let Value::Array(elements) = v else {
                    errors.add(path, &Message::ExpectedArray);
                    return None;
                };
                let output = elements
                    .iter()
                    .enumerate()
                    .filter_map(|(i, element)| items.check(Some(element), &join_index(path, i), errors))
                    .collect();
                Some(Value::Array(output))
            }
        }
    }
}

/// Wrapping combinators available on every rule
pub trait SchemaExt: Into<Schema> {
    fn optional(self) -> Schema {
        Schema::Optional(Box::new(self.into()))
    }

    fn nullable(self) -> Schema {
        Schema::Nullable(Box::new(self.into()))
    }

    fn with_default(self, default: impl Into<Value>) -> Schema {
        Schema::WithDefault(Box::new(self.into()), default.into())
    }
}

impl<T: Into<Schema>> SchemaExt for T {}

impl From<StringRule> for Schema {
    fn from(rule: StringRule) -> Self {
        Schema::String(rule)
    }
}

impl From<NumberRule> for Schema {
    fn from(rule: NumberRule) -> Self {
        Schema::Number(rule)
    }
}

impl From<EnumRule> for Schema {
    fn from(rule: EnumRule) -> Self {
        Schema::Enum(rule)
    }
}

impl From<ObjectRule> for Schema {
    fn from(rule: ObjectRule) -> Self {
        Schema::Object(rule)
    }
}

impl From<DiscriminatedUnion> for Schema {
    fn from(rule: DiscriminatedUnion) -> Self {
        Schema::Union(rule)
    }
}

pub(crate) fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

pub(crate) fn join_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
