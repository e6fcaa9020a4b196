pub mod config;
pub mod error;
pub mod point;
pub mod transport;

pub use config::{ProxyConfig, DEFAULT_ENDPOINT};
pub use error::{SendError, SendErrorCode, ValidationError};
pub use point::{FieldValue, Number, Point};
pub use transport::{send_point, send_points, send_raw};

/// Splits a request body into trimmed, non-empty line protocol lines.
pub fn split_lines(body: &str) -> Vec<&str> {
    body.split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect()
}
