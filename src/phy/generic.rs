//! Generic PHY Driver
//!
//! This module drives any IEEE 802.3 Clause 22 PHY through an [`MdioBus`].
//! The driver core never polls the PHY itself; this layer is what the
//! application uses for discovery and link management.

use crate::driver::config::{Duplex, Speed};
use crate::driver::error::{IoError, Result};
use crate::hal::mdio::{anar, anlpar, bmcr, bmsr, phy_reg, MdioBus};

/// Number of BMCR reads to wait for a soft reset to self-clear
pub const RESET_POLL_ATTEMPTS: u32 = 1_000;

/// Mask of the PHY ID bits that identify a device (OUI + model)
const PHY_ID_MASK: u32 = 0x1FFF_FFFF;

// =============================================================================
// Link Status
// =============================================================================

/// Ethernet link status information
///
/// Contains the negotiated or configured link parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link speed
    pub speed: Speed,
    /// Duplex mode
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Create a new link status
    pub const fn new(speed: Speed, duplex: Duplex) -> Self {
        Self { speed, duplex }
    }
}

/// Link change reported by [`PhyDriver::poll_link`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Link came up (or renegotiated to different parameters)
    Up(LinkStatus),
    /// Link went down
    Down,
}

// =============================================================================
// Discovery
// =============================================================================

/// A PHY found on the MDIO bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyInfo {
    /// MDIO address (0-31)
    pub addr: u8,
    /// `(PHYIDR1 << 16) | PHYIDR2`
    pub id: u32,
}

/// Read the PHY identifier
pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
    let id1 = u32::from(mdio.read(phy_addr, phy_reg::PHYIDR1)?);
    let id2 = u32::from(mdio.read(phy_addr, phy_reg::PHYIDR2)?);
    Ok((id1 << 16) | id2)
}

/// Whether an ID read back from an address belongs to a real device
///
/// An empty address floats high (all ones) or reads zero.
pub const fn is_valid_phy_id(id: u32) -> bool {
    let id = id & PHY_ID_MASK;
    id != 0 && id != PHY_ID_MASK
}

/// Scan addresses 0..=31 and return the first PHY that answers
pub fn find_first_phy<M: MdioBus>(mdio: &mut M) -> Result<Option<PhyInfo>> {
    for addr in 0..=crate::constants::MAX_PHY_ADDR {
        let id = read_phy_id(mdio, addr)?;
        if is_valid_phy_id(id) {
            #[cfg(feature = "defmt")]
            defmt::info!("PHY found at {}: id {=u32:#x}", addr, id);
            return Ok(Some(PhyInfo { addr, id }));
        }
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("no PHY found");
    Ok(None)
}

// =============================================================================
// PHY Driver Trait
// =============================================================================

/// Trait for Ethernet PHY drivers
///
/// Implementations only talk to the PHY through [`MdioBus`], so they work the
/// same over the SMI bridge and over a mock.
pub trait PhyDriver {
    /// Get the PHY address (0-31)
    fn address(&self) -> u8;

    /// Initialize the PHY: soft reset, then auto-negotiation
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Perform a soft reset
    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Enable and restart auto-negotiation
    fn enable_auto_negotiation<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Current link status, `None` while the link is down
    fn link_status<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>>;

    /// Poll the link and report only changes since the last poll
    fn poll_link<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Option<LinkEvent>>;

    /// Read the PHY identifier
    fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> Result<u32>;
}

// =============================================================================
// Generic Clause 22 PHY
// =============================================================================

/// PHY driver using only the standard registers
#[derive(Debug, Clone, Copy)]
pub struct GenericPhy {
    addr: u8,
    last_link: Option<LinkStatus>,
}

impl GenericPhy {
    /// Create a driver for the PHY at `addr`
    pub const fn new(addr: u8) -> Self {
        Self {
            addr,
            last_link: None,
        }
    }

    /// Create a driver for a PHY returned by [`find_first_phy`]
    pub const fn from_info(info: PhyInfo) -> Self {
        Self::new(info.addr)
    }

    /// Link status seen by the last [`poll_link`](PhyDriver::poll_link)
    pub fn last_link(&self) -> Option<LinkStatus> {
        self.last_link
    }

    fn resolve_link<M: MdioBus>(&self, mdio: &mut M, bmsr_val: u16) -> Result<LinkStatus> {
        if bmsr_val & bmsr::AN_COMPLETE != 0 {
            let ours = mdio.read(self.addr, phy_reg::ANAR)?;
            let theirs = mdio.read(self.addr, phy_reg::ANLPAR)?;
            if let Some(link) = resolve_negotiated(ours & theirs) {
                return Ok(link);
            }
        }

        let bmcr_val = mdio.read(self.addr, phy_reg::BMCR)?;
        let speed = if bmcr_val & bmcr::SPEED_100 != 0 {
            Speed::Mbps100
        } else {
            Speed::Mbps10
        };
        let duplex = if bmcr_val & bmcr::DUPLEX_FULL != 0 {
            Duplex::Full
        } else {
            Duplex::Half
        };
        Ok(LinkStatus::new(speed, duplex))
    }
}

/// Highest common mode from the ANAR & ANLPAR intersection
fn resolve_negotiated(common: u16) -> Option<LinkStatus> {
    if common & anlpar::CAN_100_FD != 0 {
        Some(LinkStatus::new(Speed::Mbps100, Duplex::Full))
    } else if common & anlpar::CAN_100_HD != 0 {
        Some(LinkStatus::new(Speed::Mbps100, Duplex::Half))
    } else if common & anlpar::CAN_10_FD != 0 {
        Some(LinkStatus::new(Speed::Mbps10, Duplex::Full))
    } else if common & anlpar::CAN_10_HD != 0 {
        Some(LinkStatus::new(Speed::Mbps10, Duplex::Half))
    } else {
        None
    }
}

impl PhyDriver for GenericPhy {
    fn address(&self) -> u8 {
        self.addr
    }

    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.soft_reset(mdio)?;
        mdio.write(
            self.addr,
            phy_reg::ANAR,
            anar::TX_FD | anar::TX_HD | anar::T10_FD | anar::T10_HD | anar::SELECTOR_IEEE802_3,
        )?;
        self.enable_auto_negotiation(mdio)
    }

    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        mdio.write(self.addr, phy_reg::BMCR, bmcr::RESET)?;

        for _ in 0..RESET_POLL_ATTEMPTS {
            if mdio.read(self.addr, phy_reg::BMCR)? & bmcr::RESET == 0 {
                self.last_link = None;
                return Ok(());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::error!("PHY {} reset did not complete", self.addr);
        Err(IoError::PhyError.into())
    }

    fn enable_auto_negotiation<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let bmcr_val = mdio.read(self.addr, phy_reg::BMCR)?;
        mdio.write(
            self.addr,
            phy_reg::BMCR,
            (bmcr_val | bmcr::AN_ENABLE | bmcr::AN_RESTART) & !bmcr::ISOLATE,
        )
    }

    fn link_status<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        let bmsr_val = mdio.read(self.addr, phy_reg::BMSR)?;
        if bmsr_val & bmsr::LINK_STATUS == 0 {
            return Ok(None);
        }
        self.resolve_link(mdio, bmsr_val).map(Some)
    }

    fn poll_link<M: MdioBus>(&mut self, mdio: &mut M) -> Result<Option<LinkEvent>> {
        let current = self.link_status(mdio)?;
        if current == self.last_link {
            return Ok(None);
        }
        self.last_link = current;

        #[cfg(feature = "defmt")]
        match current {
            Some(link) => defmt::info!("link up: {}", link),
            None => defmt::info!("link down"),
        }

        Ok(Some(current.map_or(LinkEvent::Down, LinkEvent::Up)))
    }

    fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> Result<u32> {
        read_phy_id(mdio, self.addr)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
