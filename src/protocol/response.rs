//! Plain (non-stream) HTTP response encoding.
//!
//! Every route except `/stream` answers with a complete HTTP/1.1 response
//! and closes the connection; keep-alive is out of scope.

use std::fmt::Write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::wall_timestamp;

/// Anti-cache header block shared by `/snapshot` and the MJPEG preamble.
pub(crate) const NO_CACHE_HEADERS: &str = "Access-Control-Allow-Origin: *\r\n\
    Cache-Control: no-store, no-cache, must-revalidate, pre-check=0, post-check=0, max-age=0\r\n\
    Pragma: no-cache\r\n\
    Expires: Mon, 3 Jan 2000 12:34:56 GMT\r\n";

fn respond(status: &str, headers: &str, body: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 + headers.len() + body.len());
    let _ = write!(
        buf,
        "HTTP/1.1 {status}\r\n{headers}Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    buf.put_slice(body);
    buf.freeze()
}

/// `200 OK` with an HTML body.
pub fn html_ok(body: &str) -> Bytes {
    respond("200 OK", "Content-Type: text/html\r\n", body.as_bytes())
}

/// `200 OK` with a JSON body.
pub fn json_ok(body: &str) -> Bytes {
    respond(
        "200 OK",
        "Content-Type: application/json\r\n",
        body.as_bytes(),
    )
}

/// `200 OK` carrying the current JPEG with anti-cache headers and a
/// microsecond `X-Timestamp` sampled at assembly.
pub fn snapshot_ok(payload: &[u8]) -> Bytes {
    let headers = format!(
        "Content-Type: image/jpeg\r\n{NO_CACHE_HEADERS}X-Timestamp: {}\r\n",
        wall_timestamp()
    );
    respond("200 OK", &headers, payload)
}

/// `200 OK` with an empty body and no body-specific headers; the reply to
/// HEAD on any known route.
pub fn head_ok() -> Bytes {
    Bytes::from_static(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}

/// Default `404` reply for unknown paths.
pub fn not_found() -> Bytes {
    respond(
        "404 Not Found",
        "Content-Type: text/plain\r\n",
        b"404: Not Found",
    )
}

/// Default rejection for methods outside the GET/HEAD whitelist.
pub fn method_not_allowed() -> Bytes {
    respond(
        "405 Method Not Allowed",
        "Allow: GET, HEAD\r\nContent-Type: text/plain\r\n",
        b"405: Method Not Allowed",
    )
}

/// Reply to an unparseable request head.
pub fn bad_request() -> Bytes {
    respond(
        "400 Bad Request",
        "Content-Type: text/plain\r\n",
        b"400: Bad Request",
    )
}
