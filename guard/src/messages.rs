//! Localized validation messages
//!
//! Every built-in check reports a [`Message`], which carries a stable
//! [`ErrorCode`] and is rendered into text only when the error is produced,
//! in the [`Locale`] the caller asked for.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used when rendering validation messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese (dashboard default)
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// English
    #[serde(rename = "en")]
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt-BR"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// Machine-readable error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Required,
    InvalidType,
    TooShort,
    TooLong,
    InvalidLength,
    InvalidFormat,
    MissingLetter,
    MissingDigit,
    NotInteger,
    OutOfRange,
    InvalidOption,
    UnrecognizedVariant,
    Custom,
}

/// A validation message before localization
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Required,
    ExpectedString,
    ExpectedNumber,
    ExpectedBoolean,
    ExpectedObject,
    ExpectedArray,
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    InvalidEmail,
    InvalidCep,
    InvalidCnpj,
    InvalidColor,
    InvalidFormat,
    PasswordNeedsLetter,
    PasswordNeedsDigit,
    NotInteger,
    NotPositive,
    GreaterThan(f64),
    AtLeast(f64),
    AtMost(f64),
    InvalidOption(Vec<String>),
    UnrecognizedVariant(String),
    UnrecognizedCommand,
    /// Caller-supplied text, identical in every locale
    Custom(Cow<'static, str>),
}

impl Message {
    pub fn custom(text: impl Into<Cow<'static, str>>) -> Self {
        Message::Custom(text.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Message::Required => ErrorCode::Required,
            Message::ExpectedString
            | Message::ExpectedNumber
            | Message::ExpectedBoolean
            | Message::ExpectedObject
            | Message::ExpectedArray => ErrorCode::InvalidType,
            Message::MinLength(_) => ErrorCode::TooShort,
            Message::MaxLength(_) => ErrorCode::TooLong,
            Message::ExactLength(_) => ErrorCode::InvalidLength,
            Message::InvalidEmail
            | Message::InvalidCep
            | Message::InvalidCnpj
            | Message::InvalidColor
            | Message::InvalidFormat => ErrorCode::InvalidFormat,
            Message::PasswordNeedsLetter => ErrorCode::MissingLetter,
            Message::PasswordNeedsDigit => ErrorCode::MissingDigit,
            Message::NotInteger => ErrorCode::NotInteger,
            Message::NotPositive
            | Message::GreaterThan(_)
            | Message::AtLeast(_)
            | Message::AtMost(_) => ErrorCode::OutOfRange,
            Message::InvalidOption(_) => ErrorCode::InvalidOption,
            Message::UnrecognizedVariant(_) | Message::UnrecognizedCommand => {
                ErrorCode::UnrecognizedVariant
            }
            Message::Custom(_) => ErrorCode::Custom,
        }
    }

    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::PtBr => self.render_pt_br(),
            Locale::En => self.render_en(),
        }
    }

    fn render_pt_br(&self) -> String {
        match self {
            Message::Required => "Campo obrigatório".to_string(),
            Message::ExpectedString => "Deve ser um texto".to_string(),
            Message::ExpectedNumber => "Deve ser um número".to_string(),
            Message::ExpectedBoolean => "Deve ser verdadeiro ou falso".to_string(),
            Message::ExpectedObject => "Deve ser um objeto".to_string(),
            Message::ExpectedArray => "Deve ser uma lista".to_string(),
            Message::MinLength(n) => format!("Deve ter pelo menos {} caracteres", n),
            Message::MaxLength(n) => format!("Deve ter no máximo {} caracteres", n),
            Message::ExactLength(n) => format!("Deve ter exatamente {} caracteres", n),
            Message::InvalidEmail => "Email inválido".to_string(),
            Message::InvalidCep => "CEP inválido".to_string(),
            Message::InvalidCnpj => "CNPJ deve ter 14 dígitos".to_string(),
            Message::InvalidColor => "Cor deve estar no formato #RRGGBB".to_string(),
            Message::InvalidFormat => "Formato inválido".to_string(),
            Message::PasswordNeedsLetter => "Senha deve conter pelo menos uma letra".to_string(),
            Message::PasswordNeedsDigit => "Senha deve conter pelo menos um número".to_string(),
            Message::NotInteger => "Deve ser um número inteiro".to_string(),
            Message::NotPositive => "Deve ser maior que zero".to_string(),
            Message::GreaterThan(x) => format!("Deve ser maior que {}", x),
            Message::AtLeast(x) => format!("Deve ser no mínimo {}", x),
            Message::AtMost(x) => format!("Deve ser no máximo {}", x),
            Message::InvalidOption(allowed) => {
                format!("Opção inválida, esperado um de: {}", allowed.join(", "))
            }
            Message::UnrecognizedVariant(tag) => format!("Valor de '{}' não reconhecido", tag),
            Message::UnrecognizedCommand => "Comando não reconhecido".to_string(),
            Message::Custom(text) => text.to_string(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Message::Required => "is required".to_string(),
            Message::ExpectedString => "must be a string".to_string(),
            Message::ExpectedNumber => "must be a number".to_string(),
            Message::ExpectedBoolean => "must be true or false".to_string(),
            Message::ExpectedObject => "must be an object".to_string(),
            Message::ExpectedArray => "must be a list".to_string(),
            Message::MinLength(n) => format!("must be at least {} characters", n),
            Message::MaxLength(n) => format!("must be at most {} characters", n),
            Message::ExactLength(n) => format!("must be exactly {} characters", n),
            Message::InvalidEmail => "must be a valid email address".to_string(),
            Message::InvalidCep => "must be a valid CEP (12345-678)".to_string(),
            Message::InvalidCnpj => "CNPJ must have 14 digits".to_string(),
            Message::InvalidColor => "color must be in #RRGGBB format".to_string(),
            Message::InvalidFormat => "has an invalid format".to_string(),
            Message::PasswordNeedsLetter => "password must contain a letter".to_string(),
            Message::PasswordNeedsDigit => "password must contain a number".to_string(),
            Message::NotInteger => "must be an integer".to_string(),
            Message::NotPositive => "must be greater than zero".to_string(),
            Message::GreaterThan(x) => format!("must be greater than {}", x),
            Message::AtLeast(x) => format!("must be at least {}", x),
            Message::AtMost(x) => format!("must be at most {}", x),
            Message::InvalidOption(allowed) => {
                format!("must be one of: {}", allowed.join(", "))
            }
            Message::UnrecognizedVariant(tag) => format!("unrecognized value for '{}'", tag),
            Message::UnrecognizedCommand => "unrecognized command".to_string(),
            Message::Custom(text) => text.to_string(),
        }
    }
}
