// Chat result type
// Shape returned by the chat processor and echoed back to the client

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processor result
///
/// Only `success` is interpreted. `fields` holds the whole object, `success`
/// included, in the order it was received, and is serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ChatResult {
    pub success: bool,
    pub fields: Map<String, Value>,
}

impl ChatResult {
    /// Failed result carrying `error` and `details` strings
    pub fn failure(error: &str, details: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("success".to_string(), Value::Bool(false));
        fields.insert("error".to_string(), Value::from(error));
        fields.insert("details".to_string(), Value::from(details));
        Self {
            success: false,
            fields,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.fields.get("error").and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for ChatResult {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get("success") {
            Some(Value::Bool(success)) => Ok(Self {
                success: *success,
                fields,
            }),
            Some(_) => Err("field `success` must be a boolean".to_string()),
            None => Err("missing field `success`".to_string()),
        }
    }
}

impl From<ChatResult> for Map<String, Value> {
    fn from(result: ChatResult) -> Self {
        result.fields
    }
}
