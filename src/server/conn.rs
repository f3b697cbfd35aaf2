//! Per-connection request handling.
//!
//! Each accepted socket gets one task that reads the request head, answers
//! plain routes directly, and hands `/stream` sockets over to the serving
//! core. Connections are single-shot: every plain response closes.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::protocol::request::{self, Method, Parsed, RequestHead};
use crate::protocol::response;
use crate::server::core::{Command, FrameInfo};

const INDEX_HTML: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
    <title>mjpeg-relay</title></head><body><ul>\
    <li><a href=\"/ping\">/ping</a></li>\
    <li><a href=\"/snapshot\">/snapshot</a></li>\
    <li><a href=\"/stream\">/stream</a></li>\
    </ul></body></html>";

pub(crate) async fn handle_connection(
    mut socket: TcpStream,
    peer_addr: SocketAddr,
    config: ServerConfig,
    commands: mpsc::Sender<Command>,
) -> Result<()> {
    socket.set_nodelay(true).ok();

    let head = match timeout(config.timeout, read_head(&mut socket)).await {
        Ok(head) => head?,
        Err(_) => return Err(Error::RequestTimeout),
    };

    match request::parse_head(&head) {
        Ok(Parsed::Head(head)) => dispatch(socket, peer_addr, head, commands).await,
        Ok(Parsed::MethodNotAllowed) => {
            socket.write_all(&response::method_not_allowed()).await?;
            Ok(())
        }
        Err(error) => {
            socket.write_all(&response::bad_request()).await?;
            Err(error)
        }
    }
}

/// Accumulate bytes until the `\r\n\r\n` head terminator, within the cap.
async fn read_head(socket: &mut TcpStream) -> Result<Vec<u8>> {
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];

    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(Error::MalformedRequest("connection closed mid-head"));
        }
        head.extend_from_slice(&chunk[..n]);
        if let Some(end) = request::find_head_end(&head) {
            head.truncate(end);
            return Ok(head);
        }
        if head.len() > request::MAX_HEAD_BYTES {
            return Err(Error::RequestTooLarge(request::MAX_HEAD_BYTES));
        }
    }
}

async fn dispatch(
    mut socket: TcpStream,
    peer_addr: SocketAddr,
    head: RequestHead,
    commands: mpsc::Sender<Command>,
) -> Result<()> {
    tracing::debug!(peer = %peer_addr, method = ?head.method, path = %head.path, "request");

    if head.method == Method::Head {
        let reply = match head.path.as_str() {
            "/" | "/ping" | "/snapshot" | "/stream" => response::head_ok(),
            _ => response::not_found(),
        };
        socket.write_all(&reply).await?;
        return Ok(());
    }

    match head.path.as_str() {
        "/" => socket.write_all(&response::html_ok(INDEX_HTML)).await?,
        "/ping" => {
            let info = inspect(&commands).await?;
            socket.write_all(&response::json_ok(&ping_body(&info))).await?;
        }
        "/snapshot" => {
            let info = inspect(&commands).await?;
            socket
                .write_all(&response::snapshot_ok(&info.payload))
                .await?;
        }
        "/stream" => {
            // Hijack: the serving core takes over the raw socket for the
            // multipart push. If the core is gone (shutdown) the send
            // fails and the socket is dropped unregistered.
            let _ = commands.send(Command::Attach { socket, peer_addr }).await;
        }
        _ => socket.write_all(&response::not_found()).await?,
    }

    Ok(())
}

/// `/ping` body: a pure function of the exposed frame.
fn ping_body(info: &FrameInfo) -> String {
    format!(
        "{{\"stream\": {{\"resolution\": {{\"width\": {}, \"height\": {}}}, \"online\": {}}}}}",
        info.width, info.height, info.online
    )
}

async fn inspect(commands: &mpsc::Sender<Command>) -> Result<FrameInfo> {
    let (reply_tx, reply_rx) = oneshot::channel();
    commands
        .send(Command::Inspect(reply_tx))
        .await
        .map_err(|_| Error::Shutdown)?;
    reply_rx.await.map_err(|_| Error::Shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_ping_body_literal() {
        let info = FrameInfo {
            payload: Bytes::new(),
            width: 640,
            height: 480,
            online: false,
        };
        assert_eq!(
            ping_body(&info),
            "{\"stream\": {\"resolution\": {\"width\": 640, \"height\": 480}, \"online\": false}}"
        );

        let info = FrameInfo { online: true, ..info };
        assert_eq!(
            ping_body(&info),
            "{\"stream\": {\"resolution\": {\"width\": 640, \"height\": 480}, \"online\": true}}"
        );
    }

    #[test]
    fn test_index_links_every_route() {
        for route in ["/ping", "/snapshot", "/stream"] {
            assert!(INDEX_HTML.contains(&format!("href=\"{route}\"")));
        }
    }
}
