use anyhow::{bail, Context, Result};
use csms_guard::forms::{LOCATION_SCHEMA, LOGIN_SCHEMA, REGISTER_SCHEMA, USER_SCHEMA, VOUCHER_SCHEMA};
use csms_guard::{
    check_depth, is_strong_password, is_valid_cep, is_valid_cnpj, is_valid_email, is_valid_phone,
    sanitize_url, sanitize_value, GuardConfig, Schema, COMMAND_SCHEMA,
};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::{FormatName, SchemaName};

fn schema_for(name: SchemaName) -> &'static Schema {
    match name {
        SchemaName::Login => &*LOGIN_SCHEMA,
        SchemaName::Register => &*REGISTER_SCHEMA,
        SchemaName::Voucher => &*VOUCHER_SCHEMA,
        SchemaName::User => &*USER_SCHEMA,
        SchemaName::Location => &*LOCATION_SCHEMA,
        SchemaName::Command => &*COMMAND_SCHEMA,
    }
}

/// Read a JSON document from `file` or stdin, enforcing the configured limits
fn read_payload(config: &GuardConfig, file: Option<&Path>) -> Result<Value> {
    let limit = config.max_input_bytes as u64 + 1;
    let mut raw = Vec::new();
    match file {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?
                .take(limit)
                .read_to_end(&mut raw)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .take(limit)
                .read_to_end(&mut raw)
                .context("Failed to read stdin")?;
        }
    }

    if raw.len() > config.max_input_bytes {
        bail!(
            "payload exceeds maximum size of {} bytes",
            config.max_input_bytes
        );
    }

    let value: Value = serde_json::from_slice(&raw).context("Invalid JSON payload")?;
    check_depth(&value, config.max_json_depth).map_err(anyhow::Error::msg)?;
    Ok(value)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn sanitize(config: &GuardConfig, file: Option<&Path>) -> Result<bool> {
    let mut value = read_payload(config, file)?;
    sanitize_value(&mut value);
    print_json(&value)?;
    Ok(true)
}

pub fn validate(
    config: &GuardConfig,
    schema: SchemaName,
    file: Option<&Path>,
    sanitize: bool,
) -> Result<bool> {
    let value = read_payload(config, file)?;
    match schema_for(schema).validate_with(&value, config.locale) {
        Ok(mut normalized) => {
            if sanitize {
                sanitize_value(&mut normalized);
            }
            info!(schema = ?schema, "payload accepted");
            print_json(&normalized)?;
            Ok(true)
        }
        Err(errors) => {
            warn!(schema = ?schema, errors = errors.len(), "payload rejected");
            print_json(&errors.report())?;
            Ok(false)
        }
    }
}

pub fn url(candidate: &str) -> bool {
    let canonical = sanitize_url(candidate);
    if canonical.is_empty() {
        warn!("URL rejected");
        return false;
    }
    println!("{}", canonical);
    true
}

pub fn check(format: FormatName, value: &str) -> bool {
    let valid = match format {
        FormatName::Email => is_valid_email(value),
        FormatName::Password => is_strong_password(value),
        FormatName::Cep => is_valid_cep(value),
        FormatName::Cnpj => is_valid_cnpj(value),
        FormatName::Phone => is_valid_phone(value),
    };
    println!("{}", if valid { "valid" } else { "invalid" });
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_payload_limits() {
        let config = GuardConfig {
            max_json_depth: 2,
            max_input_bytes: 64,
            ..GuardConfig::default()
        };

        let ok = payload_file(r#"{"a": [1, 2]}"#);
        assert!(read_payload(&config, Some(ok.path())).is_ok());

        let deep = payload_file(r#"{"a": [[[1]]]}"#);
        assert!(read_payload(&config, Some(deep.path())).is_err());

        let big = payload_file(&format!(r#"{{"a": "{}"}}"#, "x".repeat(100)));
        let err = read_payload(&config, Some(big.path())).unwrap_err();
        assert!(err.to_string().contains("maximum size"));

        let missing = std::path::PathBuf::from("/nonexistent/payload.json");
        assert!(read_payload(&config, Some(&missing)).is_err());

        let broken = payload_file("{not json");
        assert!(read_payload(&config, Some(broken.path())).is_err());
    }

    #[test]
    fn test_validate_reports_rejection() {
        let config = GuardConfig::default();
        let bad = payload_file(r#"{"commandType": "bogus"}"#);
        assert!(!validate(&config, SchemaName::Command, Some(bad.path()), false).unwrap());

        let good = payload_file(r#"{"commandType": "reset", "type": "Hard"}"#);
        assert!(validate(&config, SchemaName::Command, Some(good.path()), true).unwrap());
    }

    #[test]
    fn test_url_and_check() {
        assert!(url("https://example.com"));
        assert!(!url("javascript:alert(1)"));
        assert!(check(FormatName::Cep, "12345-678"));
        assert!(!check(FormatName::Password, "abcdefgh"));
        assert!(check(FormatName::Cnpj, "12.345.678/0001-90"));
    }
}
