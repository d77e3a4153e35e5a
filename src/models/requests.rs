//! Request DTOs for the user API
//!
//! Both bodies accept absent fields so validation can produce a precise message
//! instead of a generic deserialization rejection.

use serde::Deserialize;

use crate::models::{NewUser, UserChanges};

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";

/// Request body for POST /api/users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Validates the request and converts it into a `NewUser`.
    ///
    /// Returns the error message for the first missing field.
    pub fn validate(self) -> Result<NewUser, String> {
        let name = non_empty(self.name).ok_or_else(|| NAME_REQUIRED.to_string())?;
        let email = non_empty(self.email).ok_or_else(|| EMAIL_REQUIRED.to_string())?;
        Ok(NewUser { name, email })
    }
}

/// Request body for PUT /api/users/:id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Empty strings count as "not provided".
    pub fn into_changes(self) -> UserChanges {
        UserChanges {
            name: non_empty(self.name),
            email: non_empty(self.email),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"name": "A", "email": "a@x.com"}"#;
        let req: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.validate().unwrap(), NewUser::new("A", "a@x.com"));
    }

    #[test]
    fn test_create_request_missing_name() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err(), NAME_REQUIRED);
    }

    #[test]
    fn test_create_request_empty_email() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"name": "A", "email": ""}"#).unwrap();
        assert_eq!(req.validate().unwrap_err(), EMAIL_REQUIRED);
    }

    #[test]
    fn test_update_request_ignores_empty_fields() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"name": "", "email": "b@x.com"}"#).unwrap();
        let changes = req.into_changes();
        assert!(changes.name.is_none());
        assert_eq!(changes.email.as_deref(), Some("b@x.com"));
    }

    #[test]
    fn test_update_request_empty_object() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.into_changes().is_empty());
    }
}
