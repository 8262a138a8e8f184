//! Field normalization between store records and API objects.
//!
//! The store speaks snake_case (`column_position`, `due_date`) and keeps due
//! dates as midnight datetimes. The API speaks camelCase and plain
//! `YYYY-MM-DD` dates. Everything that crosses that line goes through here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use heck::ToLowerCamelCase;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A flat row as it leaves the store, keyed by snake_case column name.
pub type Record = Map<String, Value>;

/// Date format used at the API boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime layouts accepted in addition to plain dates and RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Rewrite every object key to lowerCamelCase, recursively.
///
/// Arrays are walked element by element; scalars (including date strings)
/// come back untouched. The output is a fixed point: normalizing it again
/// yields the same value.
pub fn to_camel_case_keys(value: Value) -> Value {
    rewrite_keys(value, &|key| key.to_lower_camel_case())
}

fn rewrite_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| (rename(&key), rewrite_keys(inner, rename)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rewrite_keys(v, rename)).collect())
        }
        other => other,
    }
}

/// Convert a store record into its API shape.
pub fn record_to_api(record: Record) -> Value {
    to_camel_case_keys(Value::Object(record))
}

/// Decode a store record into a camelCase API type.
pub fn from_record<T: DeserializeOwned>(record: Record) -> serde_json::Result<T> {
    serde_json::from_value(record_to_api(record))
}

/// Format a date for the API boundary.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date from any of the representations callers and the store use,
/// dropping the time of day.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|datetime| datetime.date())
}

/// Store representation of a due date: the date at midnight.
pub fn date_to_store(date: NaiveDate) -> String {
    format!("{} 00:00:00", format_date(date))
}

/// Serde adapter for optional `YYYY-MM-DD` dates. Empty strings read as no date.
pub mod opt_date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_date(s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {}", s))),
        }
    }
}
