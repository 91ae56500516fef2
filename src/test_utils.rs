//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the SSED driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use crate::driver::error::{IoError, IoResult, Result};
use crate::driver::netif::NetInterface;
use crate::hal::mdio::{bmcr, bmsr, phy_reg, MdioBus};

// =============================================================================
// Mock SPI Bus
// =============================================================================

/// One observable step on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Bytes written in one transfer
    Write(Vec<u8>),
    /// Number of bytes read in one transfer
    Read(usize),
    /// Settle delay in nanoseconds
    Delay(u32),
}

#[derive(Debug, Default)]
struct BusState {
    events: Vec<BusEvent>,
    read_data: VecDeque<u8>,
    write_count: usize,
    read_count: usize,
    write_faults: HashMap<usize, ErrorKind>,
    read_faults: HashMap<usize, ErrorKind>,
}

/// Scripted SPI device plus delay sharing one event log
///
/// Hand [`spi`](Self::spi) and [`delay`](Self::delay) to the code under
/// test and inspect the log afterwards.
///
/// # Example
///
/// ```ignore
/// let mock = MockBus::new();
/// mock.push_read(&[0x14]);
/// let mut bus = Bus::new(mock.spi(), mock.delay(), SettleTiming::new());
/// bus.write_read_u8(Command::GetIrq)?;
/// assert_eq!(mock.writes(), vec![vec![0x8]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// SPI handle recording into this log
    pub fn spi(&self) -> MockSpi {
        MockSpi {
            state: self.state.clone(),
        }
    }

    /// Delay handle recording into this log
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            state: self.state.clone(),
        }
    }

    /// Queue bytes returned by upcoming reads
    ///
    /// Reads past the end of the script return zeroes.
    pub fn push_read(&self, bytes: &[u8]) {
        self.state.borrow_mut().read_data.extend(bytes.iter().copied());
    }

    /// Queue a big-endian 16-bit response
    pub fn push_word(&self, value: u16) {
        self.push_read(&value.to_be_bytes());
    }

    /// Make the write with the given index (0 = first write ever) fail
    pub fn fail_write(&self, index: usize, kind: ErrorKind) {
        self.state.borrow_mut().write_faults.insert(index, kind);
    }

    /// Make the read with the given index (0 = first read ever) fail
    pub fn fail_read(&self, index: usize, kind: ErrorKind) {
        self.state.borrow_mut().read_faults.insert(index, kind);
    }

    /// Number of writes attempted so far, including failed ones
    pub fn write_count(&self) -> usize {
        self.state.borrow().write_count
    }

    /// All successful bus events in order
    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    /// Only the written byte sequences
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Total delay in nanoseconds
    pub fn total_delay_ns(&self) -> u64 {
        self.state
            .borrow()
            .events
            .iter()
            .map(|e| match e {
                BusEvent::Delay(ns) => u64::from(*ns),
                _ => 0,
            })
            .sum()
    }

    /// Unread scripted bytes
    pub fn remaining_reads(&self) -> usize {
        self.state.borrow().read_data.len()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }
}

/// SPI half of [`MockBus`]
#[derive(Debug)]
pub struct MockSpi {
    state: Rc<RefCell<BusState>>,
}

impl MockSpi {
    fn write_op(&mut self, bytes: &[u8]) -> core::result::Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        let index = state.write_count;
        state.write_count += 1;
        if let Some(kind) = state.write_faults.remove(&index) {
            return Err(kind);
        }
        state.events.push(BusEvent::Write(bytes.to_vec()));
        Ok(())
    }

    fn read_op(&mut self, buf: &mut [u8]) -> core::result::Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        let index = state.read_count;
        state.read_count += 1;
        if let Some(kind) = state.read_faults.remove(&index) {
            return Err(kind);
        }
        for byte in buf.iter_mut() {
            *byte = state.read_data.pop_front().unwrap_or(0);
        }
        state.events.push(BusEvent::Read(buf.len()));
        Ok(())
    }
}

impl ErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice<u8> for MockSpi {
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> core::result::Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => self.write_op(bytes)?,
                Operation::Read(buf) => self.read_op(buf)?,
                Operation::Transfer(read, write) => {
                    self.write_op(write)?;
                    self.read_op(read)?;
                }
                Operation::TransferInPlace(buf) => {
                    self.write_op(buf)?;
                    self.read_op(buf)?;
                }
                Operation::DelayNs(ns) => {
                    self.state.borrow_mut().events.push(BusEvent::Delay(*ns));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays into the shared log without actually waiting.
#[derive(Debug)]
pub struct MockDelay {
    state: Rc<RefCell<BusState>>,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().events.push(BusEvent::Delay(ns));
    }
}

// =============================================================================
// Mock Network Interface
// =============================================================================

/// Records what the driver reports to the network stack
#[derive(Debug, Default)]
pub struct MockNet {
    pub running: bool,
    pub stopped: bool,
    pub stop_count: usize,
    pub wake_count: usize,
    pub frames: Vec<Vec<u8>>,
    /// Number of upcoming deliveries that fail with out-of-memory
    pub oom_next: usize,
}

impl MockNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interface that is administratively up
    pub fn running() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    pub fn frame_lens(&self) -> Vec<usize> {
        self.frames.iter().map(Vec::len).collect()
    }
}

impl NetInterface for MockNet {
    fn is_running(&self) -> bool {
        self.running
    }

    fn stop_queue(&mut self) {
        self.stopped = true;
        self.stop_count += 1;
    }

    fn wake_queue(&mut self) {
        self.stopped = false;
        self.wake_count += 1;
    }

    fn receive(&mut self, frame: &[u8]) -> IoResult<()> {
        if self.oom_next > 0 {
            self.oom_next -= 1;
            return Err(IoError::OutOfMemory);
        }
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Mock MDIO bus for testing PHY drivers without hardware
///
/// BMCR reset self-clears on write, as on a real PHY, unless
/// [`set_sticky_reset`](Self::set_sticky_reset) is enabled.
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Record of writes: (phy_addr, reg_addr, value)
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    sticky_reset: bool,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    /// Keep BMCR reset set after it is written
    pub fn set_sticky_reset(&mut self, sticky: bool) {
        self.sticky_reset = sticky;
    }

    /// Populate a 10/100 PHY with the given ID and the link down
    pub fn setup_phy(&self, phy_addr: u8, id: u32) {
        self.set_register(phy_addr, phy_reg::PHYIDR1, (id >> 16) as u16);
        self.set_register(phy_addr, phy_reg::PHYIDR2, id as u16);

        let bmsr_value = bmsr::TX_FD_CAPABLE
            | bmsr::TX_HD_CAPABLE
            | bmsr::T10_FD_CAPABLE
            | bmsr::T10_HD_CAPABLE
            | bmsr::AN_ABILITY;
        self.set_register(phy_addr, phy_reg::BMSR, bmsr_value);
        self.set_register(phy_addr, phy_reg::BMCR, bmcr::AN_ENABLE);
        self.set_register(phy_addr, phy_reg::ANAR, 0x01E1);
        self.set_register(phy_addr, phy_reg::ANLPAR, 0x0000);
    }

    /// Link up after negotiation with a partner advertising `partner`
    pub fn simulate_link_up(&self, phy_addr: u8, partner: u16) {
        let bmsr_val = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        self.set_register(
            phy_addr,
            phy_reg::BMSR,
            bmsr_val | bmsr::LINK_STATUS | bmsr::AN_COMPLETE,
        );
        self.set_register(phy_addr, phy_reg::ANLPAR, partner | 0x0001);
    }

    pub fn simulate_link_down(&self, phy_addr: u8) {
        let bmsr_val = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        self.set_register(
            phy_addr,
            phy_reg::BMSR,
            bmsr_val & !(bmsr::LINK_STATUS | bmsr::AN_COMPLETE),
        );
        self.set_register(phy_addr, phy_reg::ANLPAR, 0x0000);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        Ok(self.get_register(phy_addr, reg_addr).unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.write_log
            .borrow_mut()
            .push((phy_addr, reg_addr, value));

        let stored = if reg_addr == phy_reg::BMCR && !self.sticky_reset {
            value & !bmcr::RESET
        } else {
            value
        };
        self.set_register(phy_addr, reg_addr, stored);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;
    use std::vec;

    #[test]
    fn mock_bus_logs_in_order() {
        let mock = MockBus::new();
        mock.push_read(&[0xAA]);
        let mut spi = mock.spi();
        let mut delay = mock.delay();

        spi.write(&[1, 2]).unwrap();
        delay.delay_us(25);
        let mut buf = [0u8; 2];
        spi.read(&mut buf).unwrap();

        assert_eq!(buf, [0xAA, 0x00]);
        assert_eq!(
            mock.events(),
            vec![
                BusEvent::Write(vec![1, 2]),
                BusEvent::Delay(25_000),
                BusEvent::Read(2),
            ]
        );
        assert_eq!(mock.total_delay_ns(), 25_000);
    }

    #[test]
    fn mock_bus_fault_injection() {
        let mock = MockBus::new();
        mock.fail_write(1, ErrorKind::Overrun);
        mock.fail_read(0, ErrorKind::ModeFault);
        let mut spi = mock.spi();

        assert!(spi.write(&[1]).is_ok());
        assert_eq!(spi.write(&[2]), Err(ErrorKind::Overrun));
        assert!(spi.write(&[3]).is_ok());
        let mut buf = [0u8; 1];
        assert_eq!(spi.read(&mut buf), Err(ErrorKind::ModeFault));

        assert_eq!(mock.write_count(), 3);
        assert_eq!(mock.writes(), vec![vec![1], vec![3]]);
    }

    #[test]
    fn mock_net_oom_then_accepts() {
        let mut net = MockNet::new();
        net.oom_next = 1;
        assert_eq!(net.receive(&[1, 2, 3]), Err(IoError::OutOfMemory));
        assert!(net.receive(&[4, 5]).is_ok());
        assert_eq!(net.frame_lens(), vec![2]);
    }

    #[test]
    fn mock_mdio_read_write() {
        let mut mdio = MockMdioBus::new();
        assert_eq!(mdio.read(0, 1).unwrap(), 0);

        mdio.set_register(0, 1, 0x1234);
        assert_eq!(mdio.read(0, 1).unwrap(), 0x1234);

        mdio.write(0, 4, 0x5678).unwrap();
        assert_eq!(mdio.read(0, 4).unwrap(), 0x5678);
        assert_eq!(mdio.get_writes(), vec![(0, 4, 0x5678)]);
    }

    #[test]
    fn mock_mdio_reset_self_clears() {
        let mut mdio = MockMdioBus::new();
        mdio.write(0, phy_reg::BMCR, bmcr::RESET | bmcr::AN_ENABLE)
            .unwrap();
        assert_eq!(mdio.read(0, phy_reg::BMCR).unwrap(), bmcr::AN_ENABLE);
    }
}
