use validator::{Validate, ValidationErrors};

use crate::error::{AppError, Result};
use super::models::CreateFileRequest;

/// Checks the caller-supplied fields of a completion report.
///
/// Runs before classification, so a malformed report never reaches the store.
pub fn validate_create_request(request: &CreateFileRequest) -> Result<()> {
    request.validate().map_err(|errors| AppError::BadRequest(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, err.code),
            })
        })
        .collect();

    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, storage_ref: &str) -> CreateFileRequest {
        CreateFileRequest {
            name: name.to_string(),
            organization_id: Some("org_42".to_string()),
            storage_ref: storage_ref.to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_accepts_valid_request() {
        assert!(validate_create_request(&request("logo", "ref-xyz")).is_ok());
        assert!(validate_create_request(&request(&"a".repeat(200), "ref-xyz")).is_ok());
    }

    #[test]
    fn test_rejects_empty_name() {
        match validate_create_request(&request("", "ref-xyz")) {
            Err(AppError::BadRequest(message)) => assert!(message.starts_with("name:")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_overlong_name() {
        assert!(validate_create_request(&request(&"a".repeat(201), "ref-xyz")).is_err());
    }

    #[test]
    fn test_rejects_missing_storage_ref() {
        match validate_create_request(&request("logo", "")) {
            Err(AppError::BadRequest(message)) => assert!(message.contains("storage_ref")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }
}
