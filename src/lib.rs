//! HTTP serving core for a lightweight MJPEG streamer.
//!
//! Republishes a single, continuously refreshed JPEG frame (produced by an
//! external capture component) to many concurrent HTTP clients:
//!
//! | Route       | Response                                             |
//! |-------------|------------------------------------------------------|
//! | `/`         | HTML index                                           |
//! | `/ping`     | JSON resolution + online state                       |
//! | `/snapshot` | One-shot JPEG of the current frame                   |
//! | `/stream`   | Endless `multipart/x-mixed-replace` MJPEG push       |
//!
//! The capture side publishes into a shared [`StreamSource`] from its own
//! thread; the serving core picks changes up on a ~30 ms refresh tick and
//! fans each new frame out to every streaming client. While the producer is
//! offline an embedded blank JPEG keeps the streams alive.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mjpeg_relay::{HttpServer, ServerConfig, StreamSource};
//!
//! #[tokio::main]
//! async fn main() -> mjpeg_relay::Result<()> {
//!     let source = Arc::new(StreamSource::new());
//!     // A capture component publishes into `source` from its own thread:
//!     // source.publish(&jpeg_bytes, width, height);
//!     let server = HttpServer::bind(ServerConfig::default(), Arc::clone(&source)).await?;
//!     server.run().await
//! }
//! ```

pub mod blank;
pub mod config;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod source;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::{HttpServer, ServerHandle};
pub use source::StreamSource;
