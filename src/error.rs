use thiserror::Error;

/// Rejection of a [`crate::point::Point`] at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("fieldset must not be empty")]
    EmptyFields,

    #[error("timestamp must be numeric, got {0:?}")]
    NonNumericTimestamp(String),
}

/// Transport-layer failure class of a [`SendError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendErrorCode {
    /// The HTTP client or the request target could not be built.
    Builder,
    Connect,
    Timeout,
    Request,
    /// The connection failed while the response body was being read.
    Body,
    Redirect,
    Other,
}

impl std::fmt::Display for SendErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            SendErrorCode::Builder => "builder",
            SendErrorCode::Connect => "connect",
            SendErrorCode::Timeout => "timeout",
            SendErrorCode::Request => "request",
            SendErrorCode::Body => "body",
            SendErrorCode::Redirect => "redirect",
            SendErrorCode::Other => "other",
        };
        name.fmt(f)
    }
}

/// A write request that did not make it through the transport.
///
/// HTTP error statuses never produce this error, only failures to resolve,
/// connect, transfer or read within the configured timeouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("send failed ({code}): {message}{}", response_suffix(.response))]
pub struct SendError {
    pub code: SendErrorCode,
    pub message: String,
    /// Response body read before the failure, if any.
    pub response: Option<String>,
}

fn response_suffix(response: &Option<String>) -> String {
    match response {
        Some(body) => format!(", response: {}", body),
        None => String::new(),
    }
}

impl SendError {
    pub fn new(code: SendErrorCode, message: impl Into<String>, response: Option<String>) -> Self {
        SendError {
            code,
            message: message.into(),
            response,
        }
    }

    pub(crate) fn from_reqwest(error: &reqwest::Error, response: Option<String>) -> Self {
        let code = if error.is_builder() {
            SendErrorCode::Builder
        } else if error.is_timeout() {
            SendErrorCode::Timeout
        } else if error.is_connect() {
            SendErrorCode::Connect
        } else if error.is_redirect() {
            SendErrorCode::Redirect
        } else if error.is_body() || error.is_decode() {
            SendErrorCode::Body
        } else if error.is_request() {
            SendErrorCode::Request
        } else {
            SendErrorCode::Other
        };
        SendError::new(code, full_message(error), response)
    }

    pub(crate) fn from_io(error: &std::io::Error, response: Option<String>) -> Self {
        if let Some(inner) = error
            .get_ref()
            .and_then(|e| e.downcast_ref::<reqwest::Error>())
        {
            return SendError::from_reqwest(inner, response);
        }
        let code = match error.kind() {
            std::io::ErrorKind::TimedOut => SendErrorCode::Timeout,
            _ => SendErrorCode::Body,
        };
        SendError::new(code, full_message(error), response)
    }
}

fn full_message(error: &dyn std::error::Error) -> String {
    // reqwest keeps the interesting part (refused, dns, ...) in the source chain
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
