//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! This module connects the driver to the [smoltcp](https://docs.rs/smoltcp)
//! network stack:
//!
//! - [`FrameQueue`] is the [`NetInterface`] the worker reports to. It buffers
//!   received frames until smoltcp polls for them and mirrors the transmit
//!   queue state.
//! - [`SsedDevice`] implements `smoltcp::phy::Device` on top of a shared
//!   [`Ssed`] and a [`FrameQueue`].
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface, SocketSet};
//! use ph_ssed::integration::smoltcp::{ethernet_address, SsedDevice};
//!
//! static SSED_IRQ: IrqSignal = IrqSignal::new();
//!
//! let ssed = Ssed::new(spi, delay, SsedConfig::new())?;
//! ssed.init()?;
//!
//! let mut device: SsedDevice<'_, _, _, 4> = SsedDevice::new(&ssed);
//! device.up();
//!
//! let config = Config::new(ethernet_address(&ssed).into());
//! let mut iface = Interface::new(config, &mut device, Instant::ZERO);
//!
//! loop {
//!     let now = Instant::now();
//!     device.poll_interrupt(&SSED_IRQ)?;
//!     device.tick(now);
//!     iface.poll(now, &mut device, &mut sockets);
//! }
//! ```
//!
//! # Features
//!
//! This module is only available when the `smoltcp` feature is enabled in Cargo.toml:
//! ```toml
//! [dependencies]
//! ph-ssed = { version = "0.1", features = ["smoltcp"] }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::constants::{ETH_HEADER_SIZE, MAX_FRAME_SIZE, MTU};
use crate::driver::error::{IoError, IoResult, Result};
use crate::driver::interrupt::IrqStatus;
use crate::driver::netif::NetInterface;
use crate::driver::ssed::Ssed;
use crate::sync::IrqSignal;

use smoltcp::phy::{Device, DeviceCapabilities, Medium};
use smoltcp::time::{Duration, Instant};

// =============================================================================
// Frame Queue
// =============================================================================

/// Fixed-capacity receive queue and transmit queue state
///
/// Holds up to `DEPTH` received frames. When full, [`receive`](NetInterface::receive)
/// reports [`IoError::OutOfMemory`] and the driver drops the frame.
pub struct FrameQueue<const DEPTH: usize> {
    frames: [[u8; MAX_FRAME_SIZE]; DEPTH],
    lens: [usize; DEPTH],
    head: usize,
    count: usize,
    running: bool,
    stopped: bool,
    tx_dropped: usize,
}

impl<const DEPTH: usize> FrameQueue<DEPTH> {
    /// Create an empty queue with the interface down
    pub const fn new() -> Self {
        Self {
            frames: [[0; MAX_FRAME_SIZE]; DEPTH],
            lens: [0; DEPTH],
            head: 0,
            count: 0,
            running: false,
            stopped: false,
            tx_dropped: 0,
        }
    }

    /// Bring the interface up
    pub fn up(&mut self) {
        self.running = true;
    }

    /// Take the interface down and discard buffered frames
    pub fn down(&mut self) {
        self.running = false;
        self.head = 0;
        self.count = 0;
    }

    /// Number of buffered frames
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no frames are buffered
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the driver asked for transmission to stop
    #[inline(always)]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Frames handed over by smoltcp that the driver refused
    #[inline(always)]
    pub fn tx_dropped(&self) -> usize {
        self.tx_dropped
    }

    /// Remove the oldest frame, copying it into `buf`
    ///
    /// Returns the frame length, or `None` if the queue is empty.
    pub fn pop_into(&mut self, buf: &mut [u8; MAX_FRAME_SIZE]) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let len = self.lens[self.head];
        buf[..len].copy_from_slice(&self.frames[self.head][..len]);
        self.head = (self.head + 1) % DEPTH;
        self.count -= 1;
        Some(len)
    }
}

impl<const DEPTH: usize> Default for FrameQueue<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> NetInterface for FrameQueue<DEPTH> {
    fn is_running(&self) -> bool {
        self.running
    }

    fn stop_queue(&mut self) {
        self.stopped = true;
    }

    fn wake_queue(&mut self) {
        self.stopped = false;
    }

    fn receive(&mut self, frame: &[u8]) -> IoResult<()> {
        if frame.len() > MAX_FRAME_SIZE {
            return Err(IoError::FrameTooLarge);
        }
        if self.count == DEPTH {
            return Err(IoError::OutOfMemory);
        }
        let slot = (self.head + self.count) % DEPTH;
        self.frames[slot][..frame.len()].copy_from_slice(frame);
        self.lens[slot] = frame.len();
        self.count += 1;
        Ok(())
    }
}

// =============================================================================
// RX Token
// =============================================================================

/// Receive token holding a copy of one frame
pub struct SsedRxToken {
    buf: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl smoltcp::phy::RxToken for SsedRxToken {
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(&self.buf[..self.len])
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token for smoltcp
///
/// Builds the frame on the stack and hands it to [`Ssed::submit`].
pub struct SsedTxToken<'a, SPI, D, const DEPTH: usize> {
    ssed: &'a Ssed<SPI, D>,
    queue: &'a mut FrameQueue<DEPTH>,
}

impl<SPI: SpiDevice, D: DelayNs, const DEPTH: usize> smoltcp::phy::TxToken
    for SsedTxToken<'_, SPI, D, DEPTH>
{
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let len = len.min(MAX_FRAME_SIZE);
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let result = f(&mut buffer[..len]);

        // smoltcp has no error path here; a failed submit already woke the queue
        if let Err(_e) = self.ssed.submit(&mut *self.queue, &buffer[..len]) {
            #[cfg(feature = "defmt")]
            defmt::warn!("smoltcp TX of {} bytes dropped: {}", len, _e);
            self.queue.tx_dropped = self.queue.tx_dropped.wrapping_add(1);
        }

        result
    }
}

// =============================================================================
// Device Implementation
// =============================================================================

/// smoltcp device over a shared [`Ssed`]
pub struct SsedDevice<'a, SPI, D, const DEPTH: usize> {
    ssed: &'a Ssed<SPI, D>,
    queue: FrameQueue<DEPTH>,
    last_tick: Option<Instant>,
}

impl<'a, SPI: SpiDevice, D: DelayNs, const DEPTH: usize> SsedDevice<'a, SPI, D, DEPTH> {
    /// Wrap a driver; the interface starts down
    pub fn new(ssed: &'a Ssed<SPI, D>) -> Self {
        Self {
            ssed,
            queue: FrameQueue::new(),
            last_tick: None,
        }
    }

    /// Bring the interface up
    pub fn up(&mut self) {
        self.queue.up();
    }

    /// Take the interface down
    pub fn down(&mut self) {
        self.queue.down();
    }

    /// Frame queue the driver reports to
    pub fn queue(&self) -> &FrameQueue<DEPTH> {
        &self.queue
    }

    /// Change the MAC address; the interface must be down
    pub fn set_mac_address(&mut self, mac: [u8; 6]) -> Result<()> {
        self.ssed.set_mac_address(&self.queue, mac)
    }

    /// Run the interrupt worker if the signal is pending
    pub fn poll_interrupt(&mut self, signal: &IrqSignal) -> Result<Option<IrqStatus>> {
        self.ssed.run_pending(signal, &mut self.queue)
    }

    /// Advance the transmit watchdog to `now`
    ///
    /// Returns `true` if the watchdog fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(prev) = self.last_tick else {
            self.last_tick = Some(now);
            return false;
        };
        if now <= prev {
            return false;
        }

        let ms = (now - prev).total_millis();
        if ms == 0 {
            return false;
        }
        self.last_tick = Some(prev + Duration::from_millis(ms));
        let elapsed = u32::try_from(ms).unwrap_or(u32::MAX);
        self.ssed.tick_watchdog(&mut self.queue, elapsed)
    }
}

impl<SPI: SpiDevice, D: DelayNs, const DEPTH: usize> Device for SsedDevice<'_, SPI, D, DEPTH> {
    type RxToken<'b>
        = SsedRxToken
    where
        Self: 'b;
    type TxToken<'b>
        = SsedTxToken<'b, SPI, D, DEPTH>
    where
        Self: 'b;

    fn receive(&mut self, timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        self.tick(timestamp);
        // The paired TX token must be usable, so frames wait for the slot
        if !self.queue.is_running() || self.queue.is_stopped() {
            return None;
        }

        let mut rx = SsedRxToken {
            buf: [0; MAX_FRAME_SIZE],
            len: 0,
        };
        rx.len = self.queue.pop_into(&mut rx.buf)?;

        Some((
            rx,
            SsedTxToken {
                ssed: self.ssed,
                queue: &mut self.queue,
            },
        ))
    }

    fn transmit(&mut self, timestamp: Instant) -> Option<Self::TxToken<'_>> {
        self.tick(timestamp);
        if !self.queue.is_running() || self.queue.is_stopped() {
            return None;
        }

        Some(SsedTxToken {
            ssed: self.ssed,
            queue: &mut self.queue,
        })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        // smoltcp counts the Ethernet header in the MTU
        caps.max_transmission_unit = ETH_HEADER_SIZE + MTU;
        caps.max_burst_size = Some(1);
        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the MAC address as a smoltcp EthernetAddress
pub fn ethernet_address<SPI: SpiDevice, D: DelayNs>(
    ssed: &Ssed<SPI, D>,
) -> smoltcp::wire::EthernetAddress {
    smoltcp::wire::EthernetAddress(ssed.mac_address())
}
