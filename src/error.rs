use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Missing body in request")]
    MissingBody,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Missing or invalid parameters: {0}")]
    MissingField(String),
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
    #[error("Error preparing request: {0}")]
    Preparation(String),
    #[error("{0}")]
    Invocation(String),
    #[error("{0}")]
    ServiceError(String),
    #[error("Response error: {0}")]
    Response(String),
    #[error("Audit store error: {0}")]
    AuditStore(String),
}

impl EditError {
    /// HTTP status the handler answers with when this error ends a request.
    pub fn status_code(&self) -> u16 {
        match self {
            EditError::MissingBody
            | EditError::InvalidBody(_)
            | EditError::MissingField(_)
            | EditError::UnsupportedModel(_)
            | EditError::Preparation(_) => 400,
            EditError::Invocation(_)
            | EditError::ServiceError(_)
            | EditError::Response(_)
            | EditError::AuditStore(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }
}

pub type Result<T> = std::result::Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(EditError::MissingBody.status_code(), 400);
        assert_eq!(EditError::InvalidBody("x".into()).status_code(), 400);
        assert_eq!(EditError::MissingField("mask".into()).status_code(), 400);
        assert_eq!(EditError::UnsupportedModel("sdxl".into()).status_code(), 400);
        assert!(EditError::Preparation("x".into()).is_client_error());
    }

    #[test]
    fn test_runtime_errors_map_to_500() {
        assert_eq!(EditError::Invocation("boom".into()).status_code(), 500);
        assert_eq!(EditError::Response("bad json".into()).status_code(), 500);
        assert!(!EditError::ServiceError("throttled".into()).is_client_error());
        assert_eq!(EditError::AuditStore("denied".into()).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(EditError::MissingBody.to_string(), "Missing body in request");
        assert_eq!(
            EditError::UnsupportedModel("sdxl".into()).to_string(),
            "Unsupported model: sdxl"
        );
        assert_eq!(
            EditError::MissingField("prompt.text".into()).to_string(),
            "Missing or invalid parameters: prompt.text"
        );
        assert_eq!(EditError::Invocation("boom".into()).to_string(), "boom");
    }
}
