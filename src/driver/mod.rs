//! Core driver components for the SSED co-processor.
//!
//! This module contains the essential building blocks for configuring and
//! operating the device:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`interrupt`] - Decoding of the interrupt status byte
//! - [`netif`] - The network interface the driver reports to
//! - [`tx`] - Single-slot transmit state and watchdog
//! - [`ssed`] - The main driver implementation
//!
//! # Example
//!
//! ```ignore
//! use ph_ssed::driver::{Ssed, SsedConfig, Error};
//!
//! let config = SsedConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! let ssed = Ssed::new(spi, delay, config)?;
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod interrupt;
pub mod netif;
pub mod ssed;
pub mod tx;

// Re-exports for convenience
pub use config::{validate_mac_address, Duplex, SettleTiming, Speed, SsedConfig};
pub use error::{
    ConfigError, ConfigResult, Error, IoError, IoResult, Result, TxError, TxResult,
};
pub use interrupt::{IrqStatus, IRQ_RX_PENDING, IRQ_TX_DONE};
pub use netif::NetInterface;
pub use ssed::{RxSummary, Ssed};
pub use tx::{TxSlot, TxTicket};
