//! Exposed frame: the HTTP-side cached copy of the current JPEG.
//!
//! The serving core owns exactly one [`ExposedFrame`]. Every refresh tick
//! reconciles it from the shared [`StreamSource`](crate::source::StreamSource),
//! and every response path (`/snapshot`, `/ping`, the MJPEG fan-out) reads
//! from it. The producer never touches this type.

use bytes::Bytes;

use crate::blank::{BLANK_HEIGHT, BLANK_JPEG, BLANK_WIDTH};

/// The current JPEG as served over HTTP, with dimensions and an online flag.
///
/// The backing buffer only ever grows. While `online` is false the
/// contents equal the embedded blank JPEG verbatim.
#[derive(Debug)]
pub struct ExposedFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    online: bool,
}

impl ExposedFrame {
    /// Create a frame pre-filled with the blank JPEG, offline.
    pub fn new() -> Self {
        let mut frame = Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            online: false,
        };
        frame.set_blank();
        frame
    }

    /// Frame width in pixels; zero only before the first install.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels; zero only before the first install.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True iff the last refresh reflected a real producer frame.
    pub fn online(&self) -> bool {
        self.online
    }

    /// Size of the current JPEG in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Capacity of the backing buffer. Monotonically non-decreasing.
    pub fn allocated(&self) -> usize {
        self.data.capacity()
    }

    /// Copy of the current JPEG, cheap to share across N clients.
    pub fn payload(&self) -> Bytes {
        Bytes::copy_from_slice(&self.data)
    }

    /// Grow the backing buffer to hold at least `n` bytes. Never shrinks.
    /// Contents are unspecified after a grow until the next install.
    pub fn ensure_capacity(&mut self, n: usize) {
        let len = self.data.len();
        if self.data.capacity() < n {
            self.data.reserve(n - len);
        }
    }

    /// Install a producer frame and mark the exposure online.
    pub fn copy_from(&mut self, picture: &[u8], width: u32, height: u32) {
        self.ensure_capacity(picture.len());
        self.data.clear();
        self.data.extend_from_slice(picture);
        self.width = width;
        self.height = height;
        self.online = true;
    }

    /// Install the blank JPEG and mark the exposure offline.
    ///
    /// No-op when the frame is already blank, so repeated producer-offline
    /// ticks do not rewrite the buffer.
    pub fn set_blank(&mut self) {
        if self.online || self.data.is_empty() {
            self.ensure_capacity(BLANK_JPEG.len());
            self.data.clear();
            self.data.extend_from_slice(BLANK_JPEG);
            self.width = BLANK_WIDTH;
            self.height = BLANK_HEIGHT;
            self.online = false;
        }
    }
}

impl Default for ExposedFrame {
    fn default() -> Self {
        Self::new()
    }
}
