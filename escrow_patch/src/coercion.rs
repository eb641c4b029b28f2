//! Value coercion and display formatting driven by [`ValueType`]
//!
//! `coerce` turns what the user typed into the typed JSON value the backend
//! expects. `format_value` renders a stored value for display and
//! `edit_buffer` renders it as the text placed in the edit box. For
//! representative values `coerce(format_value(x)) == x`.

use chrono::{DateTime, NaiveDate};
use error_stack::Report;
use serde_json::{Number, Value};
use tracing::{debug, error};

use crate::constants::{
    BOOLEAN_FALSE_DISPLAY, BOOLEAN_TRUE_DISPLAY, DATE_DISPLAY_FORMAT, DATE_WIRE_FORMAT,
    NOT_SET_DISPLAY,
};
use crate::error::{Error, Result};
use crate::mapping::ValueType;

/// Raw input produced by an edit widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    /// Text typed into a field
    Text(String),
    /// Explicit boolean from a switch
    Bool(bool),
    /// Flip the current boolean value
    Toggle,
    /// Date picked from a calendar widget
    Date(NaiveDate),
}

impl From<&str> for EditInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for EditInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for EditInput {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Coerce raw input to the value sent to the backend
///
/// `current` is the value presently displayed and is only consulted by
/// [`EditInput::Toggle`]. Errors:
/// - [`Error::Validation`] for a percent that is not a number
/// - [`Error::InvalidState`] for input that can never fit the type (a date for a boolean, `maybe`
///   for a boolean); these indicate a wiring bug in the caller
pub fn coerce(input: &EditInput, value_type: ValueType, current: Option<&Value>) -> Result<Value> {
    match value_type {
        ValueType::Text => coerce_text(input, value_type),
        ValueType::Currency => coerce_currency(input, value_type),
        ValueType::Percent => coerce_percent(input, value_type),
        ValueType::Boolean => coerce_boolean(input, current),
        ValueType::Date => coerce_date(input, value_type),
    }
}

fn coerce_text(input: &EditInput, value_type: ValueType) -> Result<Value> {
    match input {
        EditInput::Text(text) => Ok(Value::String(text.trim().to_string())),
        EditInput::Bool(flag) => Ok(Value::String(flag.to_string())),
        EditInput::Date(date) => Ok(Value::String(
            date.format(DATE_WIRE_FORMAT).to_string(),
        )),
        EditInput::Toggle => Err(mismatch(input, value_type)),
    }
}

fn coerce_currency(input: &EditInput, value_type: ValueType) -> Result<Value> {
    let EditInput::Text(text) = input else {
        return Err(mismatch(input, value_type));
    };
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(parse_number(text).unwrap_or_else(|| {
        debug!("currency input '{text}' is not a number, sending 0");
        Value::from(0)
    }))
}

fn coerce_percent(input: &EditInput, value_type: ValueType) -> Result<Value> {
    let EditInput::Text(text) = input else {
        return Err(mismatch(input, value_type));
    };
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    parse_number(text).ok_or_else(|| {
        Report::new(Error::Validation(format!(
            "must be a number, got '{}'",
            text.trim()
        )))
    })
}

fn coerce_boolean(input: &EditInput, current: Option<&Value>) -> Result<Value> {
    let flag = match input {
        EditInput::Bool(flag) => *flag,
        EditInput::Toggle => !current.is_some_and(is_truthy),
        EditInput::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => true,
            "false" | "no" => false,
            _ => return Err(mismatch(input, ValueType::Boolean)),
        },
        EditInput::Date(_) => return Err(mismatch(input, ValueType::Boolean)),
    };
    Ok(Value::Bool(flag))
}

fn coerce_date(input: &EditInput, value_type: ValueType) -> Result<Value> {
    match input {
        EditInput::Date(date) => Ok(Value::String(
            date.format(DATE_WIRE_FORMAT).to_string(),
        )),
        EditInput::Text(text) => Ok(parse_date(text).map_or_else(
            || {
                if !text.trim().is_empty() {
                    debug!("date input '{text}' is not a date, clearing the field");
                }
                Value::Null
            },
            |date| Value::String(date.format(DATE_WIRE_FORMAT).to_string()),
        )),
        EditInput::Bool(_) | EditInput::Toggle => Err(mismatch(input, value_type)),
    }
}

fn mismatch(input: &EditInput, value_type: ValueType) -> Report<Error> {
    error!("programmer error: {input:?} cannot be coerced to {value_type}");
    Report::new(Error::InvalidState(format!(
        "{input:?} cannot be coerced to {value_type}"
    )))
}

/// Parse a number, ignoring currency symbols, grouping commas and `%`
///
/// Integers stay integers so `"500000"` becomes `500000`, not `500000.0`.
fn parse_number(text: &str) -> Option<Value> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();
    if let Ok(integer) = cleaned.parse::<i64>() {
        return Some(Value::from(integer));
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Numeric view of a stored value, accepting numeric strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse the date forms records and users produce
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times, any string starting with
/// `YYYY-MM-DD` (`2024-03-15T00:00:00.000Z`) and the display form
/// `MM/DD/YYYY`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_WIRE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .or_else(|| {
            text.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_WIRE_FORMAT).ok())
        })
        .or_else(|| NaiveDate::parse_from_str(text, DATE_DISPLAY_FORMAT).ok())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && !text.eq_ignore_ascii_case("false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Render a stored value for display
pub fn format_value(value: Option<&Value>, value_type: ValueType) -> String {
    let Some(value) = value.filter(|_| !is_blank(value)) else {
        return NOT_SET_DISPLAY.to_string();
    };
    match value_type {
        ValueType::Currency => {
            as_number(value).map_or_else(|| NOT_SET_DISPLAY.to_string(), format_currency)
        }
        ValueType::Percent => match value {
            Value::String(text) => format!("{}%", text.trim()),
            other => format!("{other}%"),
        },
        ValueType::Boolean => {
            let display = if is_truthy(value) {
                BOOLEAN_TRUE_DISPLAY
            } else {
                BOOLEAN_FALSE_DISPLAY
            };
            display.to_string()
        }
        ValueType::Date => match value {
            Value::String(text) => parse_date(text).map_or_else(
                || text.clone(),
                |date| date.format(DATE_DISPLAY_FORMAT).to_string(),
            ),
            other => other.to_string(),
        },
        ValueType::Text => format_text(value),
    }
}

/// Render a stored value as the initial content of an edit box
pub fn edit_buffer(value: Option<&Value>, value_type: ValueType) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };
    match value_type {
        ValueType::Currency | ValueType::Percent => match value {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text.trim().to_string(),
            other => format_text(other),
        },
        ValueType::Boolean => is_truthy(value).to_string(),
        ValueType::Date => match value {
            Value::String(text) => parse_date(text).map_or_else(
                || text.clone(),
                |date| date.format(DATE_WIRE_FORMAT).to_string(),
            ),
            other => format_text(other),
        },
        ValueType::Text => format_text(value),
    }
}

fn format_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => itertools::join(items.iter().map(format_text), ", "),
        other => other.to_string(),
    }
}

/// `1234.5` -> `$1,234.50`, `12345` -> `$12,345`
fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    let grouped = group_thousands(whole);
    if cents == "00" {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
