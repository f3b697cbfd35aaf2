//! MJPEG push-protocol framing.
//!
//! A streaming client receives one HTTP/1.0 response whose body never ends:
//! a `multipart/x-mixed-replace` sequence delimited by a fixed boundary.
//!
//! ```text
//! HTTP/1.0 200 OK            ─┐
//! <anti-cache headers>        │ preamble, sent once per client
//! Content-Type: multipart/…   │
//!                             │
//! --boundarydonotcross       ─┘
//! Content-Type: image/jpeg   ─┐
//! Content-Length: <size>      │
//! X-Timestamp: <sec>.<usec>   │ one part per fan-out
//!                             │
//! <JPEG bytes>                │
//! --boundarydonotcross       ─┘
//! Content-Type: image/jpeg
//! …
//! ```
//!
//! Browsers and VLC render each part as it replaces the previous one.

use std::fmt::Write;

use bytes::{Bytes, BytesMut};

use crate::protocol::wall_timestamp;

/// The multipart boundary. Literal, never escaped.
pub const BOUNDARY: &str = "boundarydonotcross";

/// Sent once per client before its first part.
pub const STREAM_PREAMBLE: &[u8] = b"HTTP/1.0 200 OK\r\n\
    Access-Control-Allow-Origin: *\r\n\
    Cache-Control: no-store, no-cache, must-revalidate, pre-check=0, post-check=0, max-age=0\r\n\
    Pragma: no-cache\r\n\
    Expires: Mon, 3 Jan 2000 12:34:56 GMT\r\n\
    Content-Type: multipart/x-mixed-replace;boundary=boundarydonotcross\r\n\
    \r\n\
    --boundarydonotcross\r\n";

/// Terminates every part: payload CRLF, then the next boundary line.
pub const PART_TRAILER: &[u8] = b"\r\n--boundarydonotcross\r\n";

/// One boundary-delimited JPEG segment, queued as a single unit so a slow
/// client can only ever skip whole parts, never tear one.
#[derive(Debug, Clone)]
pub struct StreamPart {
    /// Prefix the part with [`STREAM_PREAMBLE`] (first part per client).
    pub preamble: bool,
    /// Part headers with the write-time timestamp baked in.
    pub header: Bytes,
    /// JPEG bytes, shared zero-copy across all clients of one fan-out.
    pub payload: Bytes,
}

impl StreamPart {
    /// Assemble a part for one client, sampling the timestamp now.
    pub fn assemble(preamble: bool, payload: Bytes) -> Self {
        Self {
            preamble,
            header: encode_part_header(payload.len()),
            payload,
        }
    }
}

fn encode_part_header(size: usize) -> Bytes {
    let mut buf = BytesMut::with_capacity(96);
    let _ = write!(
        buf,
        "Content-Type: image/jpeg\r\nContent-Length: {size}\r\nX-Timestamp: {}\r\n\r\n",
        wall_timestamp()
    );
    buf.freeze()
}
