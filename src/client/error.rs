use std::fmt;

/// Code carried by every decode failure.
pub const DECODE_ERROR_CODE: i32 = -1;
/// The request did not finish within the transport timeout.
pub const TRANSPORT_TIMEOUT_CODE: i32 = -2;
/// The connection to the server could not be established.
pub const TRANSPORT_CONNECT_CODE: i32 = -3;
/// The request could not be built (bad base URL, bad path).
pub const TRANSPORT_INVALID_REQUEST_CODE: i32 = -4;
/// Any other transport-level failure.
pub const TRANSPORT_OTHER_CODE: i32 = -5;

/// Every asynchronous operation in this crate completes with one of these.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Transport,
    HttpStatus,
    Decode,
}

/// Normalized error value for transport, HTTP and decode failures.
///
/// Two errors compare equal when their codes match; the message is for humans.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn transport(code: i32, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            code,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::HttpStatus,
            code: i32::from(status),
            message: message.into(),
        }
    }

    pub fn decode(detail: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            code: DECODE_ERROR_CODE,
            message: format!("decode error: {}", detail),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind == ApiErrorKind::HttpStatus && self.code == 403
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ApiErrorKind::Transport => {
                write!(f, "Transport error ({}): {}", self.code, self.message)
            }
            ApiErrorKind::HttpStatus => write!(f, "Reddit API error: HTTP {}: {}", self.code, self.message),
            ApiErrorKind::Decode => write!(f, "Parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::decode(err)
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::transport(TRANSPORT_INVALID_REQUEST_CODE, format!("invalid url: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_compares_codes_only() {
        let a = ApiError::http_status(403, "Forbidden");
        let b = ApiError::http_status(403, "something else entirely");
        assert_eq!(a, b);
        assert_ne!(a, ApiError::http_status(404, "Forbidden"));
    }

    #[test]
    fn decode_errors_use_minus_one() {
        let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert_eq!(err.code, DECODE_ERROR_CODE);
        assert!(err.message.starts_with("decode error"));
    }

    #[test]
    fn forbidden_is_only_http_403() {
        assert!(ApiError::http_status(403, "Forbidden").is_forbidden());
        assert!(!ApiError::http_status(404, "Not Found").is_forbidden());
        assert!(!ApiError::transport(403, "odd transport code").is_forbidden());
    }
}
