//! Parameter normalization
//!
//! Two kinds of checks live here:
//! - hard-required fields (db, identifiers, format, file, query, data) return
//!   `Result` and reject the call before any request exists;
//! - soft knobs (search field, update method, `out`, timeout) always resolve
//!   to a canonical value, falling back to the caller's default and then to a
//!   fixed fallback.

use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ParameterError;
use crate::models::{DataField, Format, OutputFormat, SearchField, UpdateMethod};

/// Used when neither the call nor the client supplies a timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// True for null, empty strings, empty arrays and empty objects
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub fn require_value<'a>(name: &'static str, value: &'a Value) -> Result<&'a Value, ParameterError> {
    if is_absent(value) {
        return Err(ParameterError::MissingParameter(name));
    }
    Ok(value)
}

pub fn require_str<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ParameterError> {
    if value.is_empty() {
        return Err(ParameterError::MissingParameter(name));
    }
    Ok(value)
}

/// A structured query must be a non-empty JSON object
pub fn require_query(value: &Value) -> Result<&Map<String, Value>, ParameterError> {
    match value {
        Value::Null => Err(ParameterError::MissingParameter("query")),
        Value::Object(map) if map.is_empty() => Err(ParameterError::MissingParameter("query")),
        Value::Object(map) => Ok(map),
        _ => Err(ParameterError::WrongQueryFormat),
    }
}

pub fn require_file(path: &Path) -> Result<PathBuf, ParameterError> {
    if path.as_os_str().is_empty() {
        return Err(ParameterError::MissingParameter("file"));
    }
    if !path.exists() {
        return Err(ParameterError::FileNotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

pub fn parse_format(value: &str) -> Result<Format, ParameterError> {
    value.parse()
}

/// Produce the exact string sent as the record payload.
///
/// Text payloads must already be strings and pass through untouched. JSON
/// payloads given as strings are only syntax-checked, so the caller's
/// original text is what goes on the wire; structured values are serialized.
pub fn normalize_data(value: &Value, format: Format) -> Result<String, ParameterError> {
    let value = require_value("data", value)?;

    match (format, value) {
        (Format::Text, Value::String(s)) => Ok(s.clone()),
        (Format::Text, _) => Err(ParameterError::WrongFormat(
            "text data must be a string".to_string(),
        )),
        (Format::Json, Value::String(s)) => {
            serde_json::from_str::<IgnoredAny>(s)
                .map_err(|e| ParameterError::WrongFormat(e.to_string()))?;
            Ok(s.clone())
        }
        (Format::Json, structured) => serde_json::to_string(structured)
            .map_err(|e| ParameterError::WrongFormat(e.to_string())),
    }
}

pub fn resolve_search_field(value: Option<&str>, default: Option<SearchField>) -> SearchField {
    match value {
        Some("rid") => SearchField::Rid,
        Some("key") => SearchField::Key,
        Some(other) => {
            tracing::debug!(value = other, "Unknown searchField, using default");
            default.unwrap_or_default()
        }
        None => default.unwrap_or_default(),
    }
}

pub fn resolve_update_method(value: Option<&str>, default: Option<UpdateMethod>) -> UpdateMethod {
    match value {
        Some("replaceRecord") => UpdateMethod::ReplaceRecord,
        Some("replaceField") => UpdateMethod::ReplaceField,
        Some(other) => {
            tracing::debug!(value = other, "Unknown updateMethod, using default");
            default.unwrap_or_default()
        }
        None => default.unwrap_or_default(),
    }
}

/// Map an update method name onto the payload field, `record` when unknown
pub fn resolve_data_field(update_method: Option<&str>, default: Option<DataField>) -> DataField {
    match update_method {
        Some("replaceRecord") => DataField::Record,
        Some("replaceField") => DataField::Field,
        _ => default.unwrap_or(DataField::Record),
    }
}

pub fn resolve_out(value: Option<&str>, default: Option<OutputFormat>) -> OutputFormat {
    match value {
        Some("json") => OutputFormat::Json,
        Some("text") => OutputFormat::Text,
        _ => default.unwrap_or_default(),
    }
}

/// Zero counts as unset at every level of the cascade
pub fn resolve_timeout(value: Option<Duration>, default: Option<Duration>) -> Duration {
    value
        .filter(|d| !d.is_zero())
        .or(default.filter(|d| !d.is_zero()))
        .unwrap_or(DEFAULT_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_value_rejects_empty_shapes() {
        for empty in [json!(null), json!(""), json!([]), json!({})] {
            assert!(matches!(
                require_value("id", &empty),
                Err(ParameterError::MissingParameter("id"))
            ));
        }
        assert!(require_value("id", &json!("42")).is_ok());
        assert!(require_value("id", &json!(0)).is_ok());
        assert!(require_value("data", &json!([1])).is_ok());
    }

    #[test]
    fn test_require_str() {
        assert!(matches!(require_str("db", ""), Err(ParameterError::MissingParameter("db"))));
        assert_eq!(require_str("db", "news").unwrap(), "news");
    }

    #[test]
    fn test_require_query() {
        assert!(matches!(
            require_query(&json!(null)),
            Err(ParameterError::MissingParameter("query"))
        ));
        assert!(matches!(
            require_query(&json!({})),
            Err(ParameterError::MissingParameter("query"))
        ));
        assert!(matches!(
            require_query(&json!("title:rust")),
            Err(ParameterError::WrongQueryFormat)
        ));
        assert!(matches!(require_query(&json!([1, 2])), Err(ParameterError::WrongQueryFormat)));

        let query = json!({"q": "rust"});
        assert_eq!(require_query(&query).unwrap().len(), 1);
    }

    #[test]
    fn test_require_file() {
        assert!(matches!(
            require_file(Path::new("")),
            Err(ParameterError::MissingParameter("file"))
        ));
        assert!(matches!(
            require_file(Path::new("definitely/not/here.txt")),
            Err(ParameterError::FileNotFound(_))
        ));

        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(require_file(file.path()).unwrap(), file.path());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("json").unwrap(), Format::Json);
        assert_eq!(parse_format("text").unwrap(), Format::Text);
        for bad in ["Json", " text", "xml", ""] {
            assert!(matches!(parse_format(bad), Err(ParameterError::WrongFormatParameter(_))));
        }
    }

    #[test]
    fn test_text_data_passes_strings_through() {
        let raw = "@GAIS_Rec:\n@title:hello\n";
        assert_eq!(normalize_data(&json!(raw), Format::Text).unwrap(), raw);
        // not validated as JSON
        assert_eq!(normalize_data(&json!("{broken"), Format::Text).unwrap(), "{broken");
    }

    #[test]
    fn test_text_data_rejects_structured_values() {
        for value in [json!({"a": 1}), json!([1]), json!(5), json!(true)] {
            assert!(matches!(
                normalize_data(&value, Format::Text),
                Err(ParameterError::WrongFormat(_))
            ));
        }
    }

    #[test]
    fn test_json_data_serializes_objects() {
        let out = normalize_data(&json!({"name": "a"}), Format::Json).unwrap();
        assert_eq!(out, r#"{"name":"a"}"#);
        assert_eq!(normalize_data(&json!([1, 2]), Format::Json).unwrap(), "[1,2]");
    }

    #[test]
    fn test_json_data_keeps_original_string() {
        let spaced = r#"{ "name" :  "a" }"#;
        assert_eq!(normalize_data(&json!(spaced), Format::Json).unwrap(), spaced);
    }

    #[test]
    fn test_json_data_reports_parse_error() {
        let err = normalize_data(&json!("{name: a}"), Format::Json).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("wrong data format, "), "got {}", message);
        assert!(message.contains("line 1"), "parse error should be appended: {}", message);
    }

    #[test]
    fn test_missing_data() {
        for format in [Format::Json, Format::Text] {
            assert!(matches!(
                normalize_data(&json!(null), format),
                Err(ParameterError::MissingParameter("data"))
            ));
            assert!(matches!(
                normalize_data(&json!(""), format),
                Err(ParameterError::MissingParameter("data"))
            ));
        }
    }

    #[test]
    fn test_soft_resolvers() {
        assert_eq!(resolve_search_field(Some("key"), None), SearchField::Key);
        assert_eq!(resolve_search_field(Some("KEY"), None), SearchField::Rid);
        assert_eq!(resolve_search_field(None, Some(SearchField::Key)), SearchField::Key);
        assert_eq!(resolve_search_field(Some("bogus"), Some(SearchField::Key)), SearchField::Key);

        assert_eq!(resolve_update_method(Some("replaceField"), None), UpdateMethod::ReplaceField);
        assert_eq!(resolve_update_method(Some("patch"), None), UpdateMethod::ReplaceRecord);
        assert_eq!(
            resolve_update_method(None, Some(UpdateMethod::ReplaceField)),
            UpdateMethod::ReplaceField
        );

        assert_eq!(resolve_data_field(Some("replaceRecord"), None), DataField::Record);
        assert_eq!(resolve_data_field(Some("replaceField"), None), DataField::Field);
        assert_eq!(resolve_data_field(Some("nope"), None), DataField::Record);
        assert_eq!(resolve_data_field(None, Some(DataField::Field)), DataField::Field);

        assert_eq!(resolve_out(Some("text"), None), OutputFormat::Text);
        assert_eq!(resolve_out(Some("html"), None), OutputFormat::Json);
        assert_eq!(resolve_out(None, Some(OutputFormat::Text)), OutputFormat::Text);
    }

    #[test]
    fn test_timeout_cascade() {
        let five = Duration::from_secs(5);
        let two = Duration::from_secs(2);
        assert_eq!(resolve_timeout(Some(five), Some(two)), five);
        assert_eq!(resolve_timeout(None, Some(two)), two);
        assert_eq!(resolve_timeout(Some(Duration::ZERO), Some(two)), two);
        assert_eq!(resolve_timeout(None, None), DEFAULT_TIMEOUT);
        assert_eq!(resolve_timeout(Some(Duration::ZERO), Some(Duration::ZERO)), DEFAULT_TIMEOUT);
    }
}
