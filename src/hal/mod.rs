//! Hardware Abstraction Layer
//!
//! This module provides the bus-facing pieces of the driver: the SPI
//! transaction primitive and the MDIO bridge built on top of it.
//!
//! # Modules
//!
//! - [`bus`]: Write/settle/read transactions and command helpers
//! - [`mdio`]: MDIO/SMI access to the PHY behind the device
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod bus;
pub mod mdio;

// Re-export commonly used types
pub use bus::Bus;
pub use mdio::{MdioBus, SsedMdio};
