//! Format validators for Brazilian form fields
//!
//! Plain predicates over strings, plus the URL guard and a few display
//! helpers. None of them allocate errors; callers decide how to report.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    /// One `@`, no whitespace, a dot inside the domain
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// CEP: 8 digits, optional hyphen after the fifth
    static ref CEP_REGEX: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();

    /// Optional +55, optional area code, 8-9 digit local number
    static ref PHONE_REGEX: Regex =
        Regex::new(r"^(\+55\s?)?(\(?\d{2}\)?\s?)?\d{4,5}-?\d{4}$").unwrap();

    /// Hex color in #RRGGBB form
    static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// Length of a CNPJ once punctuation is removed
pub const CNPJ_DIGITS: usize = 14;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least 8 characters with at least one letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8 && has_letter(password) && has_digit(password)
}

pub fn has_letter(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_alphabetic())
}

pub fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_cep(cep: &str) -> bool {
    CEP_REGEX.is_match(cep)
}

/// Digit-count check only. Check digits are not verified.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    digits_only(cnpj).len() == CNPJ_DIGITS
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_REGEX.is_match(value)
}

/// Keep only digits, `+`, `(`, `)`, `-` and spaces
pub fn sanitize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
        .collect()
}

/// Accept only absolute http(s) URLs and return their canonical form.
///
/// Anything else, unparsable input included, yields an empty string.
pub fn sanitize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed.into(),
        _ => String::new(),
    }
}

pub fn is_safe_url(url: &str) -> bool {
    !sanitize_url(url).is_empty()
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a CEP as `12345-678`; other input is returned unchanged
pub fn format_cep(cep: &str) -> String {
    let digits = digits_only(cep);
    if digits.len() != 8 {
        return cep.to_string();
    }
    format!("{}-{}", &digits[..5], &digits[5..])
}

/// Format a CNPJ as `12.345.678/0001-90`; other input is returned unchanged
pub fn format_cnpj(cnpj: &str) -> String {
    let d = digits_only(cnpj);
    if d.len() != CNPJ_DIGITS {
        return cnpj.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &d[..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..]
    )
}

/// Format a national phone number as `(11) 98765-4321` or `(11) 3456-7890`
pub fn format_phone(phone: &str) -> String {
    let d = digits_only(phone);
    match d.len() {
        11 => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
        10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("operador.sp@rede.com.br"));
        assert!(!is_valid_email("test @example.com"));
        assert!(!is_valid_email("test@example"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_strong_password() {
        assert!(is_strong_password("Password123"));
        assert!(is_strong_password("abcdefg1"));
        assert!(!is_strong_password("12345678"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("abc123"));
    }

    #[test]
    fn test_cep() {
        assert!(is_valid_cep("12345-678"));
        assert!(is_valid_cep("12345678"));
        assert!(!is_valid_cep("1234-5678"));
        assert!(!is_valid_cep("12345-67"));
        assert!(!is_valid_cep("abcde-fgh"));
    }

    #[test]
    fn test_cnpj_counts_digits_only() {
        assert!(is_valid_cnpj("12.345.678/0001-90"));
        assert!(is_valid_cnpj("12345678000190"));
        // check digits are not verified
        assert!(is_valid_cnpj("11111111111111"));
        assert!(!is_valid_cnpj("1234567800019"));
        assert!(!is_valid_cnpj(""));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("+55 (11) 98765-4321"));
        assert!(is_valid_phone("(11) 3456-7890"));
        assert!(is_valid_phone("11987654321"));
        assert!(is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("phone"));
    }

    #[test]
    fn test_sanitize_phone() {
        assert_eq!(sanitize_phone("+55 (11) 98765-4321<b>"), "+55 (11) 98765-4321");
        assert_eq!(sanitize_phone("tel: 1234.5678"), " 12345678");
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("1A2B3C"));
        assert!(!is_hex_color("#FFF"));
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url("https://example.com"), "https://example.com/");
        assert_eq!(
            sanitize_url("http://example.com/path?q=1"),
            "http://example.com/path?q=1"
        );
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("file:///etc/passwd"), "");
        assert_eq!(sanitize_url("ftp://example.com"), "");
        assert_eq!(sanitize_url("not a url"), "");
        assert_eq!(sanitize_url("/relative/path"), "");
        assert!(is_safe_url("HTTPS://Example.com"));
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_cep("12345678"), "12345-678");
        assert_eq!(format_cep("123"), "123");
        assert_eq!(format_cnpj("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_phone("12"), "12");
    }
}
