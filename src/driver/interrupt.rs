//! Interrupt status handling for the SSED device.
//!
//! This module provides the [`IrqStatus`] structure for parsing the byte
//! returned by the `GET_IRQ` command. Reading the status clears it on the
//! device side.

/// Frame(s) waiting to be received
pub const IRQ_RX_PENDING: u8 = 1 << 2;

/// Previously submitted frame has been sent
pub const IRQ_TX_DONE: u8 = 1 << 4;

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt status flags parsed from the `GET_IRQ` response.
///
/// Several flags may be set at once; a worker run must handle all of them.
///
/// # Example
///
/// ```ignore
/// let status = IrqStatus::from_raw(0x14);
/// assert!(status.rx_pending && status.tx_done);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqStatus {
    /// One or more frames are pending receive
    pub rx_pending: bool,
    /// The in-flight frame finished transmitting
    pub tx_done: bool,
    /// Raw status byte, including bits the driver does not interpret
    pub raw: u8,
}

impl IrqStatus {
    /// Create from the raw status byte
    #[inline]
    pub fn from_raw(status: u8) -> Self {
        Self {
            rx_pending: (status & IRQ_RX_PENDING) != 0,
            tx_done: (status & IRQ_TX_DONE) != 0,
            raw: status,
        }
    }

    /// Check if any interpreted interrupt is set
    #[inline]
    pub fn any(&self) -> bool {
        self.rx_pending || self.tx_done
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
