//! Ethernet PHY Management
//!
//! The PHY is reached through the co-processor's SMI commands, but this layer
//! only sees an [`MdioBus`](crate::hal::mdio::MdioBus). Discovery and link
//! management live here; the driver core never polls the PHY.
//!
//! # Example
//!
//! ```ignore
//! use ph_ssed::phy::{find_first_phy, GenericPhy, LinkEvent, PhyDriver};
//!
//! let mut mdio = ssed.mdio();
//! let info = find_first_phy(&mut mdio)?.ok_or(IoError::PhyError)?;
//!
//! let mut phy = GenericPhy::from_info(info);
//! phy.init(&mut mdio)?;
//!
//! loop {
//!     if let Some(LinkEvent::Up(link)) = phy.poll_link(&mut mdio)? {
//!         // carrier on
//!     }
//! }
//! ```

pub mod generic;

pub use generic::{
    find_first_phy, is_valid_phy_id, read_phy_id, GenericPhy, LinkEvent, LinkStatus, PhyDriver,
    PhyInfo,
};

// Re-export IEEE 802.3 standard register definitions from mdio
pub use crate::hal::mdio::{anar, anlpar, bmcr, bmsr, phy_reg};
