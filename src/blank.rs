//! Embedded "no signal" JPEG.
//!
//! Served verbatim whenever the producer is offline so clients see a blank
//! picture instead of a stalled connection.

/// Blank baseline JPEG, 640x480 uniform gray.
pub const BLANK_JPEG: &[u8] = include_bytes!("blank.jpg");

/// Width of [`BLANK_JPEG`] in pixels.
pub const BLANK_WIDTH: u32 = 640;

/// Height of [`BLANK_JPEG`] in pixels.
pub const BLANK_HEIGHT: u32 = 480;
