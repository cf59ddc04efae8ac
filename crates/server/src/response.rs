//! Response envelope shared by every recipe endpoint.
//!
//! `{ "status": "success" | "error", "data"?, "message"?, "errors"?, "count"?, "error"? }`;
//! absent fields are omitted from the JSON.

use serde::Serialize;
use service::errors::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Underlying failure detail for 5xx responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self { status: Status::Success, data: Some(data), message: None, errors: None, count: None, error: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

impl Envelope<()> {
    /// Success without a payload (e.g. delete).
    pub fn message(message: impl Into<String>) -> Self {
        Self { status: Status::Success, data: None, message: Some(message.into()), errors: None, count: None, error: None }
    }

    pub fn error(message: impl Into<String>, errors: Option<FieldErrors>, error: Option<String>) -> Self {
        Self { status: Status::Error, data: None, message: Some(message.into()), errors, count: None, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_are_omitted() {
        let v = serde_json::to_value(Envelope::message("Recipe deleted successfully")).unwrap();
        assert_eq!(v, json!({"status": "success", "message": "Recipe deleted successfully"}));
    }

    #[test]
    fn list_envelope_carries_count() {
        let v = serde_json::to_value(Envelope::success(vec![1, 2]).with_count(7)).unwrap();
        assert_eq!(v, json!({"status": "success", "data": [1, 2], "count": 7}));
    }

    #[test]
    fn error_envelope_carries_field_errors() {
        let mut errs = FieldErrors::new();
        errs.add("recipe_name", "too short");
        let v = serde_json::to_value(Envelope::error("Validation failed", Some(errs), None)).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["errors"]["recipe_name"][0], "too short");
        assert!(v.get("data").is_none());
    }
}
