//! SPI Bus Transaction HAL
//!
//! [`Bus`] is the only code that touches the SPI device. It pairs the
//! `SpiDevice` with a `DelayNs` used for the settle time the device needs
//! between a command and its response.
//!
//! Every `write` and `read` is a separate SPI transfer (one chip-select frame
//! each). Callers that need a multi-step sequence to stay atomic hold the
//! device lock around the whole sequence; see [`crate::Ssed`].

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::command::{self, Command};
use crate::constants::MAC_ADDR_LEN;
use crate::driver::config::SettleTiming;
use crate::driver::error::{IoError, IoResult};

// =============================================================================
// Bus
// =============================================================================

/// SPI bus handle with settle timing
#[derive(Debug)]
pub struct Bus<SPI, D> {
    spi: SPI,
    delay: D,
    timing: SettleTiming,
}

impl<SPI: SpiDevice, D: DelayNs> Bus<SPI, D> {
    /// Wrap an SPI device and delay provider
    pub fn new(spi: SPI, delay: D, timing: SettleTiming) -> Self {
        Self { spi, delay, timing }
    }

    /// Give the SPI device and delay back
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Write raw bytes
    pub fn write(&mut self, bytes: &[u8]) -> IoResult<()> {
        self.spi.write(bytes).map_err(IoError::from_spi)
    }

    /// Read raw bytes
    pub fn read(&mut self, buf: &mut [u8]) -> IoResult<()> {
        self.spi.read(buf).map_err(IoError::from_spi)
    }

    /// Wait the command settle time
    pub fn settle(&mut self) {
        if self.timing.command_us > 0 {
            self.delay.delay_us(self.timing.command_us);
        }
    }

    /// Wait the SMI settle time
    pub fn settle_smi(&mut self) {
        if self.timing.smi_us > 0 {
            self.delay.delay_us(self.timing.smi_us);
        }
    }

    /// Write, settle, then read
    ///
    /// The first failing transfer aborts the sequence and its error is returned.
    pub fn transact(&mut self, write: &[u8], read: &mut [u8]) -> IoResult<()> {
        self.write(write)?;
        self.settle();
        self.read(read)
    }

    // =========================================================================
    // Command Helpers
    // =========================================================================

    /// Send a one-byte command and read a one-byte response
    pub fn write_read_u8(&mut self, cmd: Command) -> IoResult<u8> {
        let mut resp = [0u8; 1];
        self.transact(&[cmd.opcode()], &mut resp)?;
        Ok(resp[0])
    }

    /// Program the station MAC address
    pub fn set_mac(&mut self, mac: &[u8; MAC_ADDR_LEN]) -> IoResult<()> {
        self.write(&command::encode_set_mac(mac))
    }

    /// Send a frame: length header, then payload
    ///
    /// The payload must already be padded; its length goes on the wire as-is.
    pub fn send_frame(&mut self, payload: &[u8]) -> IoResult<()> {
        let len = u16::try_from(payload.len()).map_err(|_| IoError::FrameTooLarge)?;
        self.write(&command::encode_frame_header(len))?;
        self.write(payload)
    }

    /// Ask the device for the length of the next pending frame
    ///
    /// Zero means nothing is pending.
    pub fn query_rx_length(&mut self) -> IoResult<u16> {
        let mut resp = [0u8; 2];
        self.transact(&[Command::RecvFrame.opcode()], &mut resp)?;
        Ok(command::decode_word(resp))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
