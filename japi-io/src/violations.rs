//! Mapping of validation failures to HTTP error responses

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// HTTP status used for validation failures
pub const STATUS_BAD_REQUEST: u16 = 400;

/// One failed validation constraint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Violation {
    /// Human-readable message
    pub message: String,
    /// Path of the offending property, e.g. `title` or `author.name`
    pub property_path: String,
    /// Value that failed validation
    #[serde(default)]
    pub invalid_value: Value,
}

impl Violation {
    /// Create a violation
    pub fn new(
        message: impl Into<String>,
        property_path: impl Into<String>,
        invalid_value: Value,
    ) -> Self {
        Self {
            message: message.into(),
            property_path: property_path.into(),
            invalid_value,
        }
    }
}

/// Top-level member holding the list of error objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKey {
    /// `errors`, as JSON-API requires
    #[default]
    Errors,
    /// `data`, for clients written against the legacy shape
    Data,
}

impl ErrorKey {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKey::Errors => "errors",
            ErrorKey::Data => "data",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorObject<'a> {
    title: &'a str,
    source: ErrorSource<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<ErrorMeta<'a>>,
}

#[derive(Debug, Serialize)]
struct ErrorSource<'a> {
    pointer: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorMeta<'a> {
    value: &'a Value,
}

/// Status code and JSON body of an error response
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Value,
}

/// Build the 400 response for a list of violations
///
/// The invalid value is echoed under `meta.value` only when it is a string,
/// number or boolean.
pub fn error_response(violations: &[Violation], key: ErrorKey) -> ErrorResponse {
    let errors: Vec<ErrorObject<'_>> = violations
        .iter()
        .map(|violation| ErrorObject {
            title: &violation.message,
            source: ErrorSource {
                pointer: &violation.property_path,
            },
            meta: is_primitive(&violation.invalid_value).then_some(ErrorMeta {
                value: &violation.invalid_value,
            }),
        })
        .collect();

    let mut body = serde_json::Map::new();
    body.insert(key.as_str().to_string(), json!(errors));

    ErrorResponse {
        status: STATUS_BAD_REQUEST,
        body: Value::Object(body),
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}
