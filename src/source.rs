//! Shared stream source: the producer's latest frame behind one mutex.
//!
//! Exactly one foreign thread exists at the boundary of the serving core:
//! the capture producer. It synchronises with the serving side only through
//! this type's mutex and its `updated` flag.
//!
//! ```text
//!  [capture thread]                       [serving core task]
//!   publish()/set_offline()   ──mutex──▶   try_consume() every tick
//!         sets `updated`                    copies out, clears `updated`
//! ```
//!
//! The lock is held only long enough to copy bytes in or out; it is never
//! held while writing to a client socket.

use parking_lot::Mutex;

use crate::frame::ExposedFrame;

/// Outcome of one refresh-tick consume pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consume {
    /// A new frame was copied into the exposed frame.
    Frame,
    /// The producer reported itself offline; the caller installs the blank
    /// frame after the lock has been released.
    Offline,
    /// Nothing new since the last pass.
    Clean,
}

#[derive(Debug, Default)]
struct SourceState {
    picture: Vec<u8>,
    width: u32,
    height: u32,
    updated: bool,
}

/// The most recently captured JPEG, shared between the producer thread and
/// the serving core.
///
/// An empty picture together with `updated` means "producer is offline".
#[derive(Debug, Default)]
pub struct StreamSource {
    state: Mutex<SourceState>,
}

impl StreamSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side: replace the latest frame and flag it for pickup.
    pub fn publish(&self, picture: &[u8], width: u32, height: u32) {
        let mut state = self.state.lock();
        state.picture.clear();
        state.picture.extend_from_slice(picture);
        state.width = width;
        state.height = height;
        state.updated = true;
    }

    /// Producer side: report capture loss.
    pub fn set_offline(&self) {
        let mut state = self.state.lock();
        state.picture.clear();
        state.updated = true;
    }

    /// Serving side: reconcile `exposed` with the latest producer state.
    ///
    /// The `updated` flag is cleared under the same acquisition that reads
    /// it, so a producer write can never be lost between read and clear.
    pub fn try_consume(&self, exposed: &mut ExposedFrame) -> Consume {
        let mut state = self.state.lock();
        if !state.updated {
            return Consume::Clean;
        }
        state.updated = false;
        if state.picture.is_empty() {
            return Consume::Offline;
        }
        exposed.copy_from(&state.picture, state.width, state.height);
        Consume::Frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

    #[test]
    fn test_consume_clean_when_untouched() {
        let source = StreamSource::new();
        let mut exposed = ExposedFrame::new();

        assert_eq!(source.try_consume(&mut exposed), Consume::Clean);
        assert!(!exposed.online());
    }

    #[test]
    fn test_publish_then_consume() {
        let source = StreamSource::new();
        let mut exposed = ExposedFrame::new();

        source.publish(JPEG, 2, 1);
        assert_eq!(source.try_consume(&mut exposed), Consume::Frame);
        assert!(exposed.online());
        assert_eq!(exposed.payload().as_ref(), JPEG);
        assert_eq!((exposed.width(), exposed.height()), (2, 1));

        // Flag was cleared under the same lock
        assert_eq!(source.try_consume(&mut exposed), Consume::Clean);
    }

    #[test]
    fn test_offline_is_a_decision_not_a_copy() {
        let source = StreamSource::new();
        let mut exposed = ExposedFrame::new();

        source.publish(JPEG, 2, 1);
        source.try_consume(&mut exposed);

        source.set_offline();
        assert_eq!(source.try_consume(&mut exposed), Consume::Offline);
        // The caller has not installed the blank yet
        assert!(exposed.online());

        exposed.set_blank();
        assert!(!exposed.online());
        assert_eq!(source.try_consume(&mut exposed), Consume::Clean);
    }

    #[test]
    fn test_publish_overwrites_pending_frame() {
        let source = StreamSource::new();
        let mut exposed = ExposedFrame::new();

        source.publish(&[0x01], 1, 1);
        source.publish(JPEG, 2, 1);

        assert_eq!(source.try_consume(&mut exposed), Consume::Frame);
        assert_eq!(exposed.payload().as_ref(), JPEG);
    }

    #[test]
    fn test_producer_thread_handoff() {
        use std::sync::Arc;

        let source = Arc::new(StreamSource::new());
        let producer = {
            let source = Arc::clone(&source);
            std::thread::spawn(move || source.publish(JPEG, 2, 1))
        };
        producer.join().expect("producer thread panicked");

        let mut exposed = ExposedFrame::new();
        assert_eq!(source.try_consume(&mut exposed), Consume::Frame);
        assert_eq!(exposed.payload().as_ref(), JPEG);
    }
}
