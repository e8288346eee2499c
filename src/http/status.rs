//! Fixed reason-phrase table and the plain-text error wire format.

use axum::http::StatusCode;

/// Reason phrase for the status codes this framework emits.
///
/// Codes outside the table report `None`.
pub fn reason_phrase(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::OK => Some("OK"),
        StatusCode::BAD_REQUEST => Some("Bad Request"),
        StatusCode::UNAUTHORIZED => Some("Unauthorized"),
        StatusCode::FORBIDDEN => Some("Forbidden"),
        StatusCode::NOT_FOUND => Some("Not Found"),
        StatusCode::METHOD_NOT_ALLOWED => Some("Method Not Allowed"),
        StatusCode::INTERNAL_SERVER_ERROR => Some("Internal Server Error"),
        _ => None,
    }
}

/// Status and body for an error response: `"<Reason Phrase>: <message>"`.
///
/// Unknown codes degrade to 500 Internal Server Error.
pub fn error_body(status: StatusCode, message: &str) -> (StatusCode, String) {
    let (status, reason) = match reason_phrase(status) {
        Some(reason) => (status, reason),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    };
    (status, format!("{}: {}", reason, message))
}
