//! Configuration validation.
//!
//! Checks every simulation config field before a run so that building the
//! sources afterwards cannot fail on a bad value.

use crate::domain::error::SimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const PRICE_KINDS: [&str; 3] = ["sine", "constant", "csv"];
pub const TRADE_KINDS: [&str; 3] = ["alternating", "scalping", "csv"];

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    validate_initial_balance(config)?;
    validate_price_section(config)?;
    validate_trades_section(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SimError {
    SimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Read an optional number, rejecting values that are present but not
/// finite numbers.
fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, SimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(invalid(section, key, format!("{key} must be a finite number"))),
        },
    }
}

fn optional_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, SimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => match s.trim().parse::<i64>() {
            Ok(v) if v >= 0 => Ok(Some(v)),
            _ => Err(invalid(
                section,
                key,
                format!("{key} must be a non-negative integer"),
            )),
        },
    }
}

fn required_kind(
    config: &dyn ConfigPort,
    section: &str,
    allowed: &[&str],
) -> Result<String, SimError> {
    let kind = config
        .get_string(section, "kind")
        .map(|s| s.trim().to_lowercase())
        .ok_or_else(|| SimError::ConfigMissing {
            section: section.to_string(),
            key: "kind".to_string(),
        })?;
    if !allowed.contains(&kind.as_str()) {
        return Err(invalid(
            section,
            "kind",
            format!("unknown kind '{kind}', expected one of {}", allowed.join(", ")),
        ));
    }
    Ok(kind)
}

fn required_path(config: &dyn ConfigPort, section: &str) -> Result<(), SimError> {
    match config.get_string(section, "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SimError::ConfigMissing {
            section: section.to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), SimError> {
    optional_number(config, "simulation", "initial_balance")?;
    Ok(())
}

fn validate_price_section(config: &dyn ConfigPort) -> Result<(), SimError> {
    let kind = required_kind(config, "price", &PRICE_KINDS)?;
    match kind.as_str() {
        "sine" => {
            optional_count(config, "price", "duration")?;
            optional_number(config, "price", "base")?;
            optional_number(config, "price", "amplitude")?;
            optional_number(config, "price", "shock")?;
            if let Some(period) = optional_number(config, "price", "period")? {
                if period <= 0.0 {
                    return Err(invalid("price", "period", "period must be positive"));
                }
            }
            Ok(())
        }
        "constant" => {
            optional_count(config, "price", "duration")?;
            match optional_number(config, "price", "value")? {
                Some(_) => Ok(()),
                None => Err(SimError::ConfigMissing {
                    section: "price".to_string(),
                    key: "value".to_string(),
                }),
            }
        }
        _ => {
            required_path(config, "price")?;
            validate_dates(config)
        }
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SimError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(invalid(
                "price",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SimError> {
    match config.get_string("price", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "price",
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
    }
}

fn validate_trades_section(config: &dyn ConfigPort) -> Result<(), SimError> {
    let kind = required_kind(config, "trades", &TRADE_KINDS)?;
    match kind.as_str() {
        "alternating" => {
            optional_number(config, "trades", "even")?;
            optional_number(config, "trades", "odd")?;
            Ok(())
        }
        "scalping" => {
            optional_number(config, "trades", "opening_quantity")?;
            optional_count(config, "trades", "opening_steps")?;
            optional_number(config, "trades", "swing")?;
            Ok(())
        }
        _ => required_path(config, "trades"),
    }
}
