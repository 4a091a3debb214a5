//! Per-layer field type coercion
//!
//! The map service returns some dates as strings and some numbers as
//! text. Each layer lists the fields to coerce; values that cannot be
//! parsed become null instead of failing the layer.

use crate::domain::{FieldType, LayerDescriptor, LayerTable};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Number, Value};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Coerce a value to epoch milliseconds
///
/// Numbers are taken as epoch milliseconds already. Strings may be
/// RFC 3339, a naive date-time (read as UTC) or a bare date (midnight UTC).
pub fn to_epoch_millis(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(_) => Value::Number(n),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Value::from(f.round() as i64))
                .unwrap_or(Value::Null),
        },
        Value::String(s) => parse_date_millis(s.trim())
            .map(Value::from)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn parse_date_millis(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    if let Ok(millis) = text.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(parsed.timestamp_millis());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&parsed).timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            let midnight = parsed.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight).timestamp_millis());
        }
    }
    None
}

/// Coerce a value to a double
pub fn to_float(value: Value) -> Value {
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Coerce a value to an integer, null when absent or not integral
pub fn to_nullable_int(value: Value) -> Value {
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    parsed.map(Value::from).unwrap_or(Value::Null)
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Apply the layer's date, double and integer coercions
///
/// Fields that are listed but absent from the table are skipped with a
/// warning. Coerced columns get their declared type updated.
pub fn apply_coercions(layer: &LayerDescriptor, table: &mut LayerTable) {
    let plans: [(&Option<Vec<String>>, FieldType, fn(Value) -> Value); 3] = [
        (&layer.date_fields, FieldType::Date, to_epoch_millis),
        (&layer.double_fields, FieldType::Double, to_float),
        (&layer.int_fields, FieldType::Integer, to_nullable_int),
    ];

    for (fields, field_type, coerce) in plans {
        let Some(fields) = fields else { continue };
        for name in fields {
            if !table.map_column(name, coerce) {
                tracing::warn!(
                    layer = %layer.name,
                    field = %name,
                    "Field listed for coercion is not in the layer"
                );
                continue;
            }
            table.set_field_type(name, field_type);
        }
    }
}
