use std::collections::BTreeMap;

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Field name -> human readable messages, in stable (sorted) field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, field: &str) -> Option<&[String]> { self.0.get(field).map(Vec::as_slice) }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() { Ok(()) } else { Err(ServiceError::Validation(self)) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v.join(" "))).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errs = FieldErrors::new();
        errs.add(field, message);
        Self::Validation(errs)
    }
}

impl From<DbErr> for ServiceError {
    /// Unique-index violations become `Conflict` so callers can re-resolve and retry.
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(msg),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_accumulate_per_field() {
        let mut errs = FieldErrors::new();
        errs.add("recipe_name", "too short");
        errs.add("recipe_name", "bad");
        errs.add("recipe_type", "required");
        assert_eq!(errs.get("recipe_name").unwrap().len(), 2);
        assert!(errs.contains("recipe_type"));
        let json = serde_json::to_value(&errs).unwrap();
        assert_eq!(json["recipe_type"][0], "required");
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(matches!(ServiceError::field("x", "y"), ServiceError::Validation(_)));
    }

    #[test]
    fn plain_db_errors_map_to_db() {
        let e: ServiceError = DbErr::Custom("boom".into()).into();
        assert!(matches!(e, ServiceError::Db(_)));
    }
}
