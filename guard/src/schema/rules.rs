//! Primitive and composite rules that make up a [`Schema`](super::Schema)

use std::fmt;

use regex::Regex;
use serde_json::{Map, Number, Value};

use super::{join_key, Schema};
use crate::errors::ValidationBuilder;
use crate::messages::Message;
use crate::validators::is_valid_email;

/// Largest integer an `f64` represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ─────────────────────────────────────────────────────────────────────────────
// Strings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum StringCheck {
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    Pattern(Regex),
    Refine(fn(&str) -> bool),
}

impl StringCheck {
    fn holds(&self, value: &str) -> bool {
        match self {
            StringCheck::MinLength(n) => value.chars().count() >= *n,
            StringCheck::MaxLength(n) => value.chars().count() <= *n,
            StringCheck::Length(n) => value.chars().count() == *n,
            StringCheck::Pattern(re) => re.is_match(value),
            StringCheck::Refine(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for StringCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringCheck::MinLength(n) => write!(f, "MinLength({})", n),
            StringCheck::MaxLength(n) => write!(f, "MaxLength({})", n),
            StringCheck::Length(n) => write!(f, "Length({})", n),
            StringCheck::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            StringCheck::Refine(_) => write!(f, "Refine(..)"),
        }
    }
}

/// A check plus the message reported when it does not hold
#[derive(Debug, Clone)]
pub struct StringConstraint {
    pub check: StringCheck,
    pub message: Message,
}

/// Rule for string fields. Every failing constraint is reported.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    constraints: Vec<StringConstraint>,
    allow_empty: bool,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constrain(mut self, check: StringCheck, message: Message) -> Self {
        self.constraints.push(StringConstraint { check, message });
        self
    }

    pub fn min(self, n: usize) -> Self {
        self.constrain(StringCheck::MinLength(n), Message::MinLength(n))
    }

    pub fn max(self, n: usize) -> Self {
        self.constrain(StringCheck::MaxLength(n), Message::MaxLength(n))
    }

    pub fn length(self, n: usize) -> Self {
        self.constrain(StringCheck::Length(n), Message::ExactLength(n))
    }

    pub fn non_empty(self) -> Self {
        self.constrain(StringCheck::MinLength(1), Message::Required)
    }

    pub fn pattern(self, regex: Regex, message: Message) -> Self {
        self.constrain(StringCheck::Pattern(regex), message)
    }

    pub fn refine(self, predicate: fn(&str) -> bool, message: Message) -> Self {
        self.constrain(StringCheck::Refine(predicate), message)
    }

    pub fn email(self) -> Self {
        self.refine(is_valid_email, Message::InvalidEmail)
    }

    /// Accept `""` as-is without running the constraints
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub(crate) fn check(&self, value: &Value, path: &str, errors: &mut ValidationBuilder) -> Option<Value> {
        let Value::String(s) = value else {
            errors.add(path, &Message::ExpectedString);
            return None;
        };
        if self.allow_empty && s.is_empty() {
            return Some(value.clone());
        }
        let before = errors.error_count();
        for constraint in &self.constraints {
            errors.check_condition(!constraint.check.holds(s), path, &constraint.message);
        }
        (errors.error_count() == before).then(|| value.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Numbers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberCheck {
    Integer,
    Positive,
    GreaterThan(f64),
    AtLeast(f64),
    AtMost(f64),
}

impl NumberCheck {
    fn holds(&self, n: f64) -> bool {
        match self {
            NumberCheck::Integer => n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER,
            NumberCheck::Positive => n > 0.0,
            NumberCheck::GreaterThan(x) => n > *x,
            NumberCheck::AtLeast(x) => n >= *x,
            NumberCheck::AtMost(x) => n <= *x,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberConstraint {
    pub check: NumberCheck,
    pub message: Message,
}

/// Rule for numeric fields, optionally accepting numeric text
#[derive(Debug, Clone, Default)]
pub struct NumberRule {
    constraints: Vec<NumberConstraint>,
    coerce: bool,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constrain(mut self, check: NumberCheck, message: Message) -> Self {
        self.constraints.push(NumberConstraint { check, message });
        self
    }

    /// Accept strings such as `"42"` and convert them before checking
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    pub fn int(self) -> Self {
        self.constrain(NumberCheck::Integer, Message::NotInteger)
    }

    pub fn positive(self) -> Self {
        self.constrain(NumberCheck::Positive, Message::NotPositive)
    }

    pub fn gt(self, x: f64) -> Self {
        self.constrain(NumberCheck::GreaterThan(x), Message::GreaterThan(x))
    }

    pub fn min(self, x: f64) -> Self {
        self.constrain(NumberCheck::AtLeast(x), Message::AtLeast(x))
    }

    pub fn max(self, x: f64) -> Self {
        self.constrain(NumberCheck::AtMost(x), Message::AtMost(x))
    }

    fn is_integer(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.check == NumberCheck::Integer)
    }

    pub(crate) fn check(&self, value: &Value, path: &str, errors: &mut ValidationBuilder) -> Option<Value> {
        let (n, coerced) = match value {
            Value::Number(num) => match num.as_f64() {
                Some(n) => (n, false),
                None => {
                    errors.add(path, &Message::ExpectedNumber);
                    return None;
                }
            },
            Value::String(text) if self.coerce => match parse_number(text) {
                Some(n) => (n, true),
                None => {
                    errors.add(path, &Message::ExpectedNumber);
                    return None;
                }
            },
            _ => {
                errors.add(path, &Message::ExpectedNumber);
                return None;
            }
        };

        let before = errors.error_count();
        for constraint in &self.constraints {
            errors.check_condition(!constraint.check.holds(n), path, &constraint.message);
        }
        if errors.error_count() != before {
            return None;
        }

        if self.is_integer() {
            Some(Value::from(n as i64))
        } else if coerced {
            Some(number_value(n))
        } else {
            Some(value.clone())
        }
    }
}

/// Parse numeric text; blank or non-finite input is rejected
fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enums, objects, unions
// ─────────────────────────────────────────────────────────────────────────────

/// String literal restricted to a fixed set
#[derive(Debug, Clone)]
pub struct EnumRule {
    allowed: Vec<String>,
}

impl EnumRule {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub(crate) fn check(&self, value: &Value, path: &str, errors: &mut ValidationBuilder) -> Option<Value> {
        match value {
            Value::String(s) if self.allowed.iter().any(|a| a == s) => Some(value.clone()),
            _ => {
                errors.add(path, &Message::InvalidOption(self.allowed.clone()));
                None
            }
        }
    }
}

/// Fixed set of named fields. Undeclared keys are dropped from the output.
#[derive(Debug, Clone, Default)]
pub struct ObjectRule {
    fields: Vec<(String, Schema)>,
}

impl ObjectRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let name = name.into();
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, schema.into()));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Every field is checked; errors from all of them are collected
    pub(crate) fn check(&self, value: &Value, path: &str, errors: &mut ValidationBuilder) -> Option<Value> {
        let Value::Object(input) = value else {
            errors.add(path, &Message::ExpectedObject);
            return None;
        };
        let mut output = Map::new();
        for (name, schema) in &self.fields {
            let field_path = join_key(path, name);
            if let Some(v) = schema.check(input.get(name), &field_path, errors) {
                output.insert(name.clone(), v);
            }
        }
        Some(Value::Object(output))
    }
}

/// Object whose shape is chosen by the literal value of one tag field
#[derive(Debug, Clone)]
pub struct DiscriminatedUnion {
    tag: String,
    variants: Vec<(String, ObjectRule)>,
    unrecognized: Message,
}

impl DiscriminatedUnion {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            unrecognized: Message::UnrecognizedVariant(tag.clone()),
            tag,
            variants: Vec::new(),
        }
    }

    pub fn variant(mut self, tag_value: impl Into<String>, shape: ObjectRule) -> Self {
        self.variants.push((tag_value.into(), shape));
        self
    }

    /// Message reported when the tag is missing or matches no variant
    pub fn unrecognized(mut self, message: Message) -> Self {
        self.unrecognized = message;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn tag_values(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(value, _)| value.as_str())
    }

    pub(crate) fn check(&self, value: &Value, path: &str, errors: &mut ValidationBuilder) -> Option<Value> {
        let Value::Object(input) = value else {
            errors.add(path, &Message::ExpectedObject);
            return None;
        };
        let selected = input
            .get(&self.tag)
            .and_then(Value::as_str)
            .and_then(|tag| self.variants.iter().find(|(name, _)| name == tag));

        let Some((tag_value, shape)) = selected else {
            errors.add(&join_key(path, &self.tag), &self.unrecognized);
            return None;
        };

        let mut output = Map::new();
        output.insert(self.tag.clone(), Value::String(tag_value.clone()));
        if let Some(Value::Object(fields)) = shape.check(value, path, errors) {
            output.extend(fields);
        }
        Some(Value::Object(output))
    }
}
