use serde::Serialize;

/// Success envelope wrapping every 2xx payload
///
/// Mirrors the error envelope in `errors.rs`: a fixed `status` code, a
/// human-readable message, and the operation's data.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

/// Wraps `data` in the standard success envelope
pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> SuccessResponse<T> {
    SuccessResponse {
        status: "SUCCESS",
        message: message.into(),
        data,
    }
}
