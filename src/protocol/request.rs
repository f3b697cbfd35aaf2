//! HTTP request-head parsing.
//!
//! Only enough of HTTP/1.x to dispatch the fixed routes: the request line is
//! parsed, headers are consumed and ignored, bodies are unsupported (the
//! accepted methods carry none).

use crate::error::{Error, Result};

/// Request heads larger than this are rejected outright.
pub const MAX_HEAD_BYTES: usize = 4096;

/// Accepted request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

/// A parsed, dispatchable request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    /// Request path with any query string already split off; routes never
    /// interpret queries.
    pub path: String,
}

/// Outcome of parsing a syntactically valid request line.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Head(RequestHead),
    /// A method outside the GET/HEAD whitelist; answered with the default
    /// method-not-allowed response.
    MethodNotAllowed,
}

/// Position one past the `\r\n\r\n` terminator, if present.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

/// Parse a complete request head.
pub fn parse_head(head: &[u8]) -> Result<Parsed> {
    let text = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequest("request head is not valid UTF-8"))?;
    let line = text
        .lines()
        .next()
        .ok_or(Error::MalformedRequest("empty request"))?;

    let mut parts = line.split(' ').filter(|p| !p.is_empty());
    let method = parts
        .next()
        .ok_or(Error::MalformedRequest("missing method"))?;
    let target = parts
        .next()
        .ok_or(Error::MalformedRequest("missing request target"))?;
    let version = parts
        .next()
        .ok_or(Error::MalformedRequest("missing HTTP version"))?;
    if !version.starts_with("HTTP/") {
        return Err(Error::MalformedRequest("bad HTTP version"));
    }

    let method = match method {
        "GET" => Method::Get,
        "HEAD" => Method::Head,
        _ => return Ok(Parsed::MethodNotAllowed),
    };

    let path = match target.split_once('?') {
        Some((path, _query)) => path,
        None => target,
    };

    Ok(Parsed::Head(RequestHead {
        method,
        path: path.to_string(),
    }))
}
