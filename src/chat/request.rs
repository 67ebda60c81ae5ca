//! Chat request decoding
//!
//! Turns a raw request body into a typed `ChatRequest`. No field is required;
//! a field that is present must carry the expected JSON type. `null` counts as
//! absent and unknown fields are ignored.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Chat request forwarded to the processor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Conversation history, message shape is owned by the processor
    #[serde(rename = "messageList", skip_serializing_if = "Option::is_none")]
    pub message_list: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intention_setting: Option<Value>,
}

/// A body field whose JSON type does not match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} (expected {expected})")]
pub struct FieldError {
    pub field: &'static str,
    pub expected: &'static str,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Invalid fields: {}", join_fields(.0))]
    InvalidFields(Vec<FieldError>),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode a request body into a `ChatRequest`
///
/// All offending fields are reported together rather than stopping at the first.
pub fn decode(body: &[u8]) -> Result<ChatRequest, DecodeError> {
    let fields = match serde_json::from_slice::<Value>(body)? {
        Value::Object(fields) => fields,
        other => return Err(DecodeError::NotAnObject(json_kind(&other))),
    };

    let mut errors = Vec::new();
    let request = ChatRequest {
        input: extract(&fields, "input", "string", &mut errors, |v| {
            v.as_str().map(str::to_owned)
        }),
        message_list: extract(&fields, "messageList", "array", &mut errors, |v| {
            v.as_array().cloned()
        }),
        apikey: extract(&fields, "apikey", "string", &mut errors, |v| {
            v.as_str().map(str::to_owned)
        }),
        system_instruction: extract(&fields, "systemInstruction", "string", &mut errors, |v| {
            v.as_str().map(str::to_owned)
        }),
        temperature: extract(&fields, "temperature", "number", &mut errors, Value::as_f64),
        intention_setting: extract(&fields, "intention_setting", "any", &mut errors, |v| {
            Some(v.clone())
        }),
    };

    if errors.is_empty() {
        Ok(request)
    } else {
        Err(DecodeError::InvalidFields(errors))
    }
}

fn extract<T>(
    fields: &Map<String, Value>,
    name: &'static str,
    expected: &'static str,
    errors: &mut Vec<FieldError>,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let converted = convert(value);
            if converted.is_none() {
                errors.push(FieldError {
                    field: name,
                    expected,
                });
            }
            converted
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_body() {
        let body = json!({
            "input": "hello",
            "messageList": [{"role": "user", "content": "hi"}],
            "apikey": "sk-test",
            "systemInstruction": "be brief",
            "temperature": 0.7,
            "intention_setting": {"mode": "chat"}
        });
        let request = decode(body.to_string().as_bytes()).unwrap();

        assert_eq!(request.input.as_deref(), Some("hello"));
        assert_eq!(request.message_list.as_ref().map(Vec::len), Some(1));
        assert_eq!(request.apikey.as_deref(), Some("sk-test"));
        assert_eq!(request.system_instruction.as_deref(), Some("be brief"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.intention_setting, Some(json!({"mode": "chat"})));
    }

    #[test]
    fn test_decode_empty_object() {
        let request = decode(b"{}").unwrap();
        assert_eq!(request, ChatRequest::default());
    }

    #[test]
    fn test_decode_null_and_unknown_fields() {
        let request = decode(br#"{"input": null, "model": "ignored"}"#).unwrap();
        assert_eq!(request, ChatRequest::default());
    }

    #[test]
    fn test_decode_integer_temperature() {
        let request = decode(br#"{"temperature": 1}"#).unwrap();
        assert_eq!(request.temperature, Some(1.0));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode(b"not-json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(decode(b"").unwrap_err(), DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_not_an_object() {
        let err = decode(b"[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "Request body must be a JSON object, got array");
    }

    #[test]
    fn test_decode_lists_all_invalid_fields() {
        let err = decode(br#"{"input": 42, "temperature": "hot", "apikey": "ok"}"#).unwrap_err();
        let DecodeError::InvalidFields(fields) = &err else {
            panic!("expected InvalidFields, got {err:?}");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field).collect();
        assert_eq!(names, vec!["input", "temperature"]);
        assert_eq!(
            err.to_string(),
            "Invalid fields: input (expected string), temperature (expected number)"
        );
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let request = ChatRequest {
            input: Some("hi".to_string()),
            message_list: Some(vec![]),
            system_instruction: Some("sys".to_string()),
            ..ChatRequest::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"input": "hi", "messageList": [], "systemInstruction": "sys"})
        );
    }
}
