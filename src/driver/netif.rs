//! Network interface seam.
//!
//! The driver does not own a network stack. It talks to one through
//! [`NetInterface`], which plays the role of the upper-layer net device:
//! it owns the outgoing queue state and accepts received frames.

use super::error::IoResult;

/// Upper-layer network interface the driver reports to
///
/// All methods are called from worker/task context, never from the
/// interrupt handler.
pub trait NetInterface {
    /// Whether the interface is administratively up
    ///
    /// The MAC address can only be changed while the interface is down.
    fn is_running(&self) -> bool;

    /// Stop handing frames to the driver
    ///
    /// Called as soon as a frame is accepted for transmission.
    fn stop_queue(&mut self);

    /// Resume handing frames to the driver
    ///
    /// Called once per accepted frame: on transmit completion, on watchdog
    /// expiry, or when the bus write failed.
    fn wake_queue(&mut self);

    /// Deliver a received frame
    ///
    /// The slice is only valid for the duration of the call; the interface
    /// copies what it keeps. Return [`IoError::OutOfMemory`](super::error::IoError::OutOfMemory)
    /// when no buffer is available; the driver drops the frame and keeps draining.
    fn receive(&mut self, frame: &[u8]) -> IoResult<()>;
}
