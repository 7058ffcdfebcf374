use std::fmt;

use serde::Deserialize;

/// Shown in the chat when the backend cannot be reached
pub const UNREACHABLE_TEXT: &str =
    "Cannot reach the backend API.\n\nStart the FastAPI server:\n\n  uvicorn app.main:app --reload";

/// Errors from talking to the DocuMind backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// No response at all: network failure, CORS, timeout
    Unreachable(String),
    /// Non-2xx response with the server's detail message
    Status { status: u16, detail: String },
    /// Response body did not match the contract
    Decode(String),
    /// Refused client-side before sending
    Rejected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Build a status error, taking `detail` from a FastAPI-style body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) if !detail.is_null() => detail.to_string(),
            _ => "Unknown error".to_string(),
        };
        ApiError::Status { status, detail }
    }

    /// Whether the backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }

    /// Text for the error bubble in the chat transcript
    pub fn chat_text(&self) -> String {
        match self {
            ApiError::Unreachable(_) => UNREACHABLE_TEXT.to_string(),
            ApiError::Status { status, detail } => format!("API error {}: {}", status, detail),
            ApiError::Decode(msg) => format!("API error: {}", msg),
            ApiError::Rejected(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unreachable(msg) => write!(f, "Backend unreachable: {}", msg),
            ApiError::Status { status, detail } => write!(f, "API error {}: {}", status, detail),
            ApiError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            ApiError::Rejected(msg) => write!(f, "Request rejected: {}", msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_string_detail() {
        let err = ApiError::from_response(400, br#"{"detail":"No documents indexed"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                detail: "No documents indexed".into()
            }
        );
        assert_eq!(err.chat_text(), "API error 400: No documents indexed");
    }

    #[test]
    fn test_from_response_structured_detail() {
        let err = ApiError::from_response(422, br#"{"detail":[{"msg":"field required"}]}"#);
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 422);
                assert!(detail.contains("field required"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_response_without_detail() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.chat_text(), "API error 502: Unknown error");
    }

    #[test]
    fn test_unreachable_text() {
        let err = ApiError::Unreachable("TypeError: Failed to fetch".into());
        assert!(err.is_unreachable());
        assert!(err.chat_text().starts_with("Cannot reach the backend API."));
        assert_eq!(err.to_string(), "Backend unreachable: TypeError: Failed to fetch");
    }
}
