use crate::config::ProxyConfig;
use crate::error::{SendError, SendErrorCode};
use crate::point::Point;
use log::{debug, trace};
use std::io::Read;
use std::time::{Duration, Instant};

// Overall budget for one write, connection included
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(100);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const READ_CHUNK_SIZE: usize = 4096;

#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn send_point(config: &ProxyConfig, point: &Point) -> Result<(), SendError> {
    send_raw(config, &point.to_line_protocol())
}

#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn send_points(config: &ProxyConfig, points: &[Point]) -> Result<(), SendError> {
    // Sends every point in one request body, one line per point in slice order
    send_raw(config, &join_points(points))
}

pub fn join_points(points: &[Point]) -> String {
    points
        .iter()
        .map(Point::to_line_protocol)
        .collect::<Vec<String>>()
        .join("\n")
}

/// POSTs `body` as is to the write URL of `config`.
///
/// Only transport failures are errors: the response status is not checked,
/// so an endpoint answering 4xx or 5xx still counts as a successful send.
/// [`WRITE_TIMEOUT`] bounds the whole exchange, response body included.
///
/// Blocks the calling thread; async callers must go through `spawn_blocking`.
#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn send_raw(config: &ProxyConfig, body: &str) -> Result<(), SendError> {
    let function_start = Instant::now();
    let deadline = function_start + WRITE_TIMEOUT;
    let url = config.write_url();

    // The client lives for this call only and is dropped on every return path
    let client = reqwest::blocking::Client::builder()
        .timeout(WRITE_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|error| SendError::from_reqwest(&error, None))?;

    let mut response = client
        .post(&url)
        .body(body.to_owned())
        .send()
        .map_err(|error| SendError::from_reqwest(&error, None))?;
    let status = response.status();

    let mut captured: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        // Each read is bounded by the client timeout on its own, so the
        // deadline is checked between reads
        if Instant::now() >= deadline {
            return Err(SendError::new(
                SendErrorCode::Timeout,
                format!(
                    "operation timed out after {:?} with {} response bytes received",
                    function_start.elapsed(),
                    captured.len()
                ),
                partial_response(&captured),
            ));
        }
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => captured.extend_from_slice(&chunk[..read]),
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(SendError::from_io(&error, partial_response(&captured))),
        }
    }

    debug!(
        "Sent {} bytes to {} (status {})",
        body.len(),
        url,
        status
    );
    trace!("send_raw duration: {:?}", function_start.elapsed());
    Ok(())
}

fn partial_response(captured: &[u8]) -> Option<String> {
    if captured.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(captured).into_owned())
    }
}
