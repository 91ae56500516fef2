//! Single-slot transmit state.
//!
//! The device buffers exactly one outgoing frame. [`TxSlot`] tracks whether
//! that buffer is occupied and runs the transmit watchdog: a single-shot,
//! level-based timer that frees the slot if no completion interrupt arrives
//! in time.
//!
//! The watchdog does not know whether the device actually sent the frame.
//! Expiry is treated as success and the frame is silently lost if the
//! transfer really failed.

use super::error::{TxError, TxResult};

/// Proof that the caller owns the slot for one frame
///
/// Only the matching ticket can release the slot after a failed write, so a
/// late failure cannot free a slot that was already handed to a newer frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxTicket(u32);

impl TxTicket {
    /// Sequence number of the frame
    pub const fn seq(&self) -> u32 {
        self.0
    }
}

/// Transmit slot and watchdog
#[derive(Debug, Clone, Copy)]
pub struct TxSlot {
    in_flight: Option<u32>,
    next_seq: u32,
    elapsed_ms: u32,
    timeout_ms: u32,
}

impl TxSlot {
    /// Create an empty slot with the given watchdog timeout
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            in_flight: None,
            next_seq: 0,
            elapsed_ms: 0,
            timeout_ms,
        }
    }

    /// Whether a frame currently occupies the slot
    #[inline(always)]
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Watchdog timeout in milliseconds
    #[inline(always)]
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Claim the slot for a new frame and arm the watchdog
    pub fn acquire(&mut self) -> TxResult<TxTicket> {
        if self.in_flight.is_some() {
            return Err(TxError::Busy);
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.in_flight = Some(seq);
        self.elapsed_ms = 0;
        Ok(TxTicket(seq))
    }

    /// Give the slot back after a failed write
    ///
    /// Returns `true` if the ticket still owned the slot.
    pub fn release(&mut self, ticket: TxTicket) -> bool {
        if self.in_flight == Some(ticket.0) {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Free the slot on a completion interrupt
    pub fn complete(&mut self) -> TxResult<()> {
        if self.in_flight.is_none() {
            return Err(TxError::NoFrameInFlight);
        }
        self.clear();
        Ok(())
    }

    /// Advance the watchdog by `elapsed_ms`
    ///
    /// Returns `true` exactly once per stuck frame, when the accumulated
    /// in-flight time reaches the timeout. The slot is freed at that point.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < self.timeout_ms {
            return false;
        }
        self.clear();
        true
    }

    fn clear(&mut self) {
        self.in_flight = None;
        self.elapsed_ms = 0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
