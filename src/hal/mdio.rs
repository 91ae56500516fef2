//! MDIO (Management Data Input/Output) HAL
//!
//! The PHY sits behind the co-processor, so register access is tunneled
//! through SMI commands on the SPI bus. [`SsedMdio`] performs that tunneling
//! and implements [`MdioBus`], which is all the PHY layer needs.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use spin::Mutex;

use super::bus::Bus;
use crate::command::{self, Command, SmiAddress, SmiOp};
use crate::driver::error::Result;

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing
/// the PHY driver to work with various MDIO implementations.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

// =============================================================================
// SMI Bridge
// =============================================================================

/// MDIO access tunneled over the device's SMI commands
///
/// Borrowed from [`Ssed::mdio`](crate::Ssed::mdio). Each register access
/// holds the bus lock for its whole command sequence.
pub struct SsedMdio<'a, SPI, D> {
    bus: &'a Mutex<Bus<SPI, D>>,
}

impl<'a, SPI, D> SsedMdio<'a, SPI, D> {
    /// Create a bridge over a locked bus
    pub fn new(bus: &'a Mutex<Bus<SPI, D>>) -> Self {
        Self { bus }
    }
}

impl<SPI: SpiDevice, D: DelayNs> MdioBus for SsedMdio<'_, SPI, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        let addr = SmiAddress::new(phy_addr, reg_addr)?;

        let mut bus = self.bus.lock();
        bus.write(&addr.encode(SmiOp::Read))?;
        bus.settle_smi();
        bus.write(&[Command::GetSmi.opcode()])?;

        let mut resp = [0u8; 2];
        bus.read(&mut resp)?;
        Ok(command::decode_word(resp))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        let addr = SmiAddress::new(phy_addr, reg_addr)?;

        let mut bus = self.bus.lock();
        bus.write(&command::encode_smi_data(value))?;
        bus.write(&addr.encode(SmiOp::Write))?;
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.bus.is_locked()
    }
}

// =============================================================================
// PHY Register Definitions (IEEE 802.3 standard registers)
// =============================================================================

/// Standard PHY register addresses (IEEE 802.3 Clause 22)
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
    /// Auto-Negotiation Advertisement Register
    pub const ANAR: u8 = 4;
    /// Auto-Negotiation Link Partner Ability Register
    pub const ANLPAR: u8 = 5;
}

/// BMCR (Basic Mode Control Register) bits
pub mod bmcr {
    /// Soft reset
    pub const RESET: u16 = 1 << 15;
    /// Speed select (100 Mbps if set)
    pub const SPEED_100: u16 = 1 << 13;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Isolate
    pub const ISOLATE: u16 = 1 << 10;
    /// Restart auto-negotiation
    pub const AN_RESTART: u16 = 1 << 9;
    /// Duplex mode (full duplex if set)
    pub const DUPLEX_FULL: u16 = 1 << 8;
}

/// BMSR (Basic Mode Status Register) bits
pub mod bmsr {
    /// 100BASE-TX full duplex capable
    pub const TX_FD_CAPABLE: u16 = 1 << 14;
    /// 100BASE-TX half duplex capable
    pub const TX_HD_CAPABLE: u16 = 1 << 13;
    /// 10BASE-T full duplex capable
    pub const T10_FD_CAPABLE: u16 = 1 << 12;
    /// 10BASE-T half duplex capable
    pub const T10_HD_CAPABLE: u16 = 1 << 11;
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Auto-negotiation ability
    pub const AN_ABILITY: u16 = 1 << 3;
    /// Link status
    pub const LINK_STATUS: u16 = 1 << 2;
}

/// ANAR (Auto-Negotiation Advertisement Register) bits
pub mod anar {
    /// 100BASE-TX full duplex
    pub const TX_FD: u16 = 1 << 8;
    /// 100BASE-TX half duplex
    pub const TX_HD: u16 = 1 << 7;
    /// 10BASE-T full duplex
    pub const T10_FD: u16 = 1 << 6;
    /// 10BASE-T half duplex
    pub const T10_HD: u16 = 1 << 5;
    /// IEEE 802.3 selector value
    pub const SELECTOR_IEEE802_3: u16 = 0x0001;
}

/// ANLPAR (Auto-Negotiation Link Partner Ability Register) bits
///
/// Same bit layout as ANAR, but represents what the link partner advertises.
pub mod anlpar {
    /// 100BASE-TX full duplex
    pub const CAN_100_FD: u16 = 1 << 8;
    /// 100BASE-TX half duplex
    pub const CAN_100_HD: u16 = 1 << 7;
    /// 10BASE-T full duplex
    pub const CAN_10_FD: u16 = 1 << 6;
    /// 10BASE-T half duplex
    pub const CAN_10_HD: u16 = 1 << 5;
    /// IEEE 802.3 selector value
    pub const SELECTOR_802_3: u16 = 0x0001;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::config::SettleTiming;
    use crate::driver::error::{ConfigError, Error, IoError};
    use crate::test_utils::{BusEvent, MockBus, MockDelay, MockSpi};
    use embedded_hal::spi::ErrorKind;
    use std::vec;

    fn locked_bus(mock: &MockBus) -> Mutex<Bus<MockSpi, MockDelay>> {
        Mutex::new(Bus::new(mock.spi(), mock.delay(), SettleTiming::new()))
    }

    #[test]
    fn read_emits_smi_sequence() {
        let mock = MockBus::new();
        mock.push_read(&[0x12, 0x34]);
        let bus = locked_bus(&mock);
        let mut mdio = SsedMdio::new(&bus);

        assert_eq!(mdio.read(3, 5).unwrap(), 0x1234);
        assert_eq!(
            mock.events(),
            vec![
                BusEvent::Write(vec![0x1, 0x0, 0x65]),
                BusEvent::Delay(1_000_000),
                BusEvent::Write(vec![0x2]),
                BusEvent::Read(2),
            ]
        );
    }

    #[test]
    fn write_emits_data_then_op() {
        let mock = MockBus::new();
        let bus = locked_bus(&mock);
        let mut mdio = SsedMdio::new(&bus);

        mdio.write(3, 5, 0x1234).unwrap();
        assert_eq!(
            mock.events(),
            vec![
                BusEvent::Write(vec![0x3, 0x12, 0x34]),
                BusEvent::Write(vec![0x1, 0x4, 0x65]),
            ]
        );
    }

    #[test]
    fn invalid_address_touches_nothing() {
        let mock = MockBus::new();
        let bus = locked_bus(&mock);
        let mut mdio = SsedMdio::new(&bus);

        assert_eq!(
            mdio.read(32, 0),
            Err(Error::Config(ConfigError::InvalidPhyAddress))
        );
        assert_eq!(
            mdio.write(0, 40, 0),
            Err(Error::Config(ConfigError::InvalidRegister))
        );
        assert!(mock.events().is_empty());
    }

    #[test]
    fn failed_op_write_aborts_read() {
        let mock = MockBus::new();
        mock.fail_write(0, ErrorKind::Other);
        let bus = locked_bus(&mock);
        let mut mdio = SsedMdio::new(&bus);

        assert_eq!(
            mdio.read(1, 1),
            Err(Error::Io(IoError::Bus(ErrorKind::Other)))
        );
        assert!(mock.events().is_empty());
        assert!(!mdio.is_busy());
    }

    #[test]
    fn lock_released_after_access() {
        let mock = MockBus::new();
        mock.push_read(&[0, 0]);
        let bus = locked_bus(&mock);
        let mut mdio = SsedMdio::new(&bus);

        mdio.read(0, 1).unwrap();
        assert!(!mdio.is_busy());
        assert!(bus.try_lock().is_some());
    }

    #[test]
    fn busy_while_bus_held() {
        let mock = MockBus::new();
        let bus = locked_bus(&mock);
        let mdio = SsedMdio::new(&bus);

        let _guard = bus.lock();
        assert!(mdio.is_busy());
    }

    #[test]
    fn register_bits() {
        assert_eq!(bmcr::RESET, 0x8000);
        assert_eq!(bmsr::LINK_STATUS, 0x0004);
        assert_eq!(anlpar::CAN_100_FD, anar::TX_FD);
    }
}
