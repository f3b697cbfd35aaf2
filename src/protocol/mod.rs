//! Minimal HTTP/1.x surface: request-head parsing, plain response encoding,
//! and the MJPEG push framing.
//!
//! The server owns the whole HTTP exchange on the raw TCP socket, so the
//! push protocol's HTTP/1.0 preamble can be emitted byte-exactly with no
//! residual framework state on the connection.

pub mod mjpeg;
pub mod request;
pub mod response;

use std::time::{SystemTime, UNIX_EPOCH};

/// Realtime clock as `<sec>.<usec>`, microseconds by truncation.
///
/// This is the `X-Timestamp` value; it is sampled at response assembly and
/// per client write, not per refresh tick.
pub fn wall_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_timestamp_shape() {
        let ts = wall_timestamp();
        let (secs, micros) = ts.split_once('.').expect("no dot");
        assert!(!secs.is_empty());
        assert!(secs.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(micros.len(), 6);
        assert!(micros.bytes().all(|b| b.is_ascii_digit()));
    }
}
