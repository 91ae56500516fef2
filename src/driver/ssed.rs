//! Core SSED driver implementation.
//!
//! This module contains the main [`Ssed`] structure: the per-device context
//! that owns the bus and runs the receive pump, the transmit pump and the
//! interrupt worker.
//!
//! # Execution contexts
//!
//! Nothing here may run in interrupt context. The interrupt handler only
//! calls [`IrqSignal::signal`]; a worker task then calls
//! [`Ssed::run_pending`] (or [`Ssed::service_interrupt`] directly after
//! waiting on the signal).
//!
//! # Locking
//!
//! All bus traffic goes through one non-reentrant `spin::Mutex`. Every
//! multi-step sequence (IRQ query, TX header and payload, RX length and
//! payload, SMI read/write, SET_MAC) holds it for the whole sequence. The
//! receive pump takes the lock once per frame and releases it before
//! delivering, so the network stack may call [`Ssed::submit`] from inside
//! [`NetInterface::receive`].

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use spin::Mutex;

use super::config::{validate_mac_address, SsedConfig};
use super::error::{ConfigError, ConfigResult, Error, IoError, Result, TxError};
use super::interrupt::IrqStatus;
use super::netif::NetInterface;
use super::tx::{TxSlot, TxTicket};
use crate::command::Command;
use crate::constants::{MAC_ADDR_LEN, MAX_FRAME_SIZE, MIN_FRAME_SIZE};
use crate::hal::bus::Bus;
use crate::hal::mdio::SsedMdio;
use crate::sync::IrqSignal;

// =============================================================================
// Receive Summary
// =============================================================================

/// Outcome of one receive drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxSummary {
    /// Frames handed to the network interface
    pub delivered: usize,
    /// Frames read from the device but not delivered
    pub dropped: usize,
}

// =============================================================================
// Driver State
// =============================================================================

#[derive(Debug)]
struct State {
    tx: TxSlot,
    mac_addr: [u8; MAC_ADDR_LEN],
}

// =============================================================================
// SSED Driver
// =============================================================================

/// SSED co-processor driver
///
/// Owns the SPI device, the receive staging buffer and the transmit slot.
/// All methods take `&self` so the driver can be shared between the worker
/// and the network stack.
///
/// # Example
///
/// ```ignore
/// static SSED_IRQ: IrqSignal = IrqSignal::new();
///
/// let ssed = Ssed::new(spi_device, delay, SsedConfig::new())?;
/// ssed.init()?;
///
/// let mut mdio = ssed.mdio();
/// if let Some(info) = find_first_phy(&mut mdio)? {
///     GenericPhy::from_info(info).init(&mut mdio)?;
/// }
///
/// loop {
///     ssed.run_pending(&SSED_IRQ, &mut net)?;
///     ssed.tick_watchdog(&mut net, elapsed_ms);
/// }
/// ```
pub struct Ssed<SPI, D> {
    bus: Mutex<Bus<SPI, D>>,
    rx_buf: Mutex<[u8; MAX_FRAME_SIZE]>,
    state: Mutex<State>,
    config: SsedConfig,
}

impl<SPI: SpiDevice, D: DelayNs> Ssed<SPI, D> {
    /// Create a driver over an SPI device
    ///
    /// Nothing is sent to the device until [`init`](Self::init).
    pub fn new(spi: SPI, delay: D, config: SsedConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            bus: Mutex::new(Bus::new(spi, delay, config.timing)),
            rx_buf: Mutex::new([0; MAX_FRAME_SIZE]),
            state: Mutex::new(State {
                tx: TxSlot::new(config.tx_timeout_ms),
                mac_addr: config.mac_address,
            }),
            config,
        })
    }

    /// Program the configured MAC address into the device
    pub fn init(&self) -> Result<()> {
        let mac = self.config.mac_address;
        self.bus.lock().set_mac(&mac)?;
        self.state.lock().mac_addr = mac;

        #[cfg(feature = "defmt")]
        defmt::info!("SSED initialized, MAC {:x}", mac);
        Ok(())
    }

    /// Give the SPI device and delay back
    pub fn release(self) -> (SPI, D) {
        self.bus.into_inner().release()
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Configuration the driver was created with
    #[inline(always)]
    pub fn config(&self) -> &SsedConfig {
        &self.config
    }

    /// Current MAC address
    pub fn mac_address(&self) -> [u8; MAC_ADDR_LEN] {
        self.state.lock().mac_addr
    }

    /// Whether a transmitted frame is awaiting completion
    pub fn tx_in_flight(&self) -> bool {
        self.state.lock().tx.in_flight()
    }

    /// MDIO access to the PHY behind the device
    pub fn mdio(&self) -> SsedMdio<'_, SPI, D> {
        SsedMdio::new(&self.bus)
    }

    // =========================================================================
    // MAC Configuration
    // =========================================================================

    /// Change the station MAC address
    ///
    /// Only allowed while the interface is down.
    pub fn set_mac_address<N: NetInterface>(
        &self,
        net: &N,
        mac: [u8; MAC_ADDR_LEN],
    ) -> Result<()> {
        if net.is_running() {
            return Err(ConfigError::InterfaceRunning.into());
        }
        validate_mac_address(&mac)?;

        self.bus.lock().set_mac(&mac)?;
        self.state.lock().mac_addr = mac;
        Ok(())
    }

    // =========================================================================
    // Interrupt Dispatch
    // =========================================================================

    /// Read and clear the device interrupt status
    pub fn read_irq_status(&self) -> Result<IrqStatus> {
        let raw = self.bus.lock().write_read_u8(Command::GetIrq)?;
        Ok(IrqStatus::from_raw(raw))
    }

    /// Service a queued interrupt, if any
    ///
    /// Returns `Ok(None)` when no run was pending.
    pub fn run_pending<N: NetInterface>(
        &self,
        signal: &IrqSignal,
        net: &mut N,
    ) -> Result<Option<IrqStatus>> {
        if !signal.take() {
            return Ok(None);
        }
        self.service_interrupt(net).map(Some)
    }

    /// Worker body: query the status and handle every reported event
    ///
    /// Transmit completion is handled before the receive drain. A failed
    /// status read ends the run; the next interrupt edge tries again.
    pub fn service_interrupt<N: NetInterface>(&self, net: &mut N) -> Result<IrqStatus> {
        let status = match self.read_irq_status() {
            Ok(status) => status,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("IRQ status read failed: {}", e);
                return Err(e);
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("IRQ status {=u8:#x}", status.raw);

        if status.tx_done {
            match self.complete_tx(net) {
                Ok(()) => {}
                Err(Error::Tx(TxError::NoFrameInFlight)) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("TX completion with nothing in flight");
                }
                Err(e) => return Err(e),
            }
        }

        if status.rx_pending {
            self.drain_rx(net)?;
        }

        Ok(status)
    }

    // =========================================================================
    // Receive Pump
    // =========================================================================

    /// Read every pending frame and deliver it to `net`
    ///
    /// Stops when the device reports a length of zero. A bus failure ends
    /// the drain with that error; frames already delivered stay delivered.
    pub fn drain_rx<N: NetInterface>(&self, net: &mut N) -> Result<RxSummary> {
        let mut summary = RxSummary::default();
        let mut staging = self.rx_buf.lock();

        loop {
            let len = {
                let mut bus = self.bus.lock();
                let len = usize::from(bus.query_rx_length()?);
                if len == 0 {
                    break;
                }
                if len > MAX_FRAME_SIZE {
                    discard(&mut *bus, &mut staging[..], len)?;
                    #[cfg(feature = "defmt")]
                    defmt::warn!("dropped oversized RX frame ({} bytes)", len);
                    summary.dropped += 1;
                    continue;
                }
                bus.read(&mut staging[..len])?;
                len
            };

            #[cfg(feature = "defmt")]
            defmt::debug!("frame with {} bytes received", len);

            match net.receive(&staging[..len]) {
                Ok(()) => summary.delivered += 1,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("dropping RX frame: {}", _e);
                    summary.dropped += 1;
                }
            }
        }

        Ok(summary)
    }

    // =========================================================================
    // Transmit Pump
    // =========================================================================

    /// Send one frame
    ///
    /// Stops the interface queue, pads frames shorter than 60 bytes with
    /// zeroes and writes header and payload under one bus lock. The queue is
    /// woken again by the completion interrupt, by the watchdog, or right
    /// away if the bus write fails.
    pub fn submit<N: NetInterface>(&self, net: &mut N, frame: &[u8]) -> Result<TxTicket> {
        if frame.len() > MAX_FRAME_SIZE {
            return Err(IoError::FrameTooLarge.into());
        }

        let ticket = self.state.lock().tx.acquire()?;
        net.stop_queue();

        let mut padded = [0u8; MIN_FRAME_SIZE];
        let payload = if frame.len() < MIN_FRAME_SIZE {
            padded[..frame.len()].copy_from_slice(frame);
            &padded[..]
        } else {
            frame
        };

        let sent = self.bus.lock().send_frame(payload);
        if let Err(e) = sent {
            #[cfg(feature = "defmt")]
            defmt::error!("TX of {} bytes failed: {}", payload.len(), e);
            if self.state.lock().tx.release(ticket) {
                net.wake_queue();
            }
            return Err(e.into());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("frame {} with {} bytes sent", ticket.seq(), payload.len());
        Ok(ticket)
    }

    /// Handle a transmit completion: free the slot and wake the queue
    pub fn complete_tx<N: NetInterface>(&self, net: &mut N) -> Result<()> {
        self.state.lock().tx.complete()?;
        net.wake_queue();
        Ok(())
    }

    /// Advance the transmit watchdog by `elapsed_ms`
    ///
    /// Returns `true` if the in-flight frame timed out. The slot is freed and
    /// the queue woken without knowing whether the device sent the frame.
    pub fn tick_watchdog<N: NetInterface>(&self, net: &mut N, elapsed_ms: u32) -> bool {
        if !self.state.lock().tx.tick(elapsed_ms) {
            return false;
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("TX timeout, waking queue");
        net.wake_queue();
        true
    }
}

/// Read out and throw away `len` bytes of a frame too large to stage
fn discard<SPI: SpiDevice, D: DelayNs>(
    bus: &mut Bus<SPI, D>,
    scratch: &mut [u8],
    len: usize,
) -> Result<()> {
    let mut remaining = len;
    while remaining > 0 {
        let chunk = remaining.min(scratch.len());
        bus.read(&mut scratch[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
