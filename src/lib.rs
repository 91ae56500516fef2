//! SSED Driver
//!
//! A `no_std`, `no_alloc` Rust driver for a simple SPI Ethernet device (SSED):
//! a co-processor that owns the Ethernet MAC and PHY and exchanges whole
//! frames with the host over SPI using a small command protocol.
//!
//! # Architecture
//!
//! The driver is organized into these layers:
//!
//! 1. **Protocol** ([`command`]): Opcodes and byte-level encodings
//! 2. **HAL Layer** ([`hal`]): The bus transaction primitive and the MDIO bridge
//! 3. **Driver** ([`driver`]): Interrupt worker, RX drain, TX pump and watchdog
//! 4. **PHY Layer** ([`phy`]): Discovery and link management over MDIO
//! 5. **Sync** ([`sync`]): Interrupt-to-worker signalling
//!
//! ## Execution Model
//!
//! - The interrupt handler only calls [`IrqSignal::signal`]. It never touches
//!   the bus.
//! - A worker task services the device: it reads the status byte, completes
//!   the in-flight transmit and drains all pending receive frames.
//! - The network stack calls [`Ssed::submit`] to send one frame at a time.
//!   The interface queue is stopped until the completion interrupt or the
//!   transmit watchdog wakes it.
//!
//! # Features
//!
//! - `defmt`: Enable defmt logging and formatting for error types
//! - `smoltcp`: Enable smoltcp network stack integration
//! - `async`: Enable async waiting on the interrupt signal
//!
//! # Example
//!
//! ```ignore
//! use ph_ssed::{find_first_phy, GenericPhy, IrqSignal, PhyDriver, Ssed, SsedConfig};
//!
//! static SSED_IRQ: IrqSignal = IrqSignal::new();
//!
//! let config = SsedConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56]);
//! let ssed = Ssed::new(spi_device, delay, config)?;
//! ssed.init()?;
//!
//! let mut mdio = ssed.mdio();
//! if let Some(info) = find_first_phy(&mut mdio)? {
//!     GenericPhy::from_info(info).init(&mut mdio)?;
//! }
//!
//! loop {
//!     ssed.run_pending(&SSED_IRQ, &mut net)?;
//!     ssed.tick_watchdog(&mut net, 1);
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels mirror the [lints] table in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod command;
pub mod constants;
pub mod driver;
pub mod hal;
pub mod phy;
pub mod sync;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use command::{Command, Response, SmiAddress, SmiOp};
pub use driver::config::{Duplex, SettleTiming, Speed, SsedConfig};
pub use driver::error::{
    ConfigError, ConfigResult, Error, IoError, IoResult, Result, TxError, TxResult,
};
pub use driver::interrupt::IrqStatus;
pub use driver::netif::NetInterface;
pub use driver::ssed::{RxSummary, Ssed};
pub use driver::tx::TxTicket;

// Re-export bus and MDIO types
pub use hal::{Bus, MdioBus, SsedMdio};

// Re-export PHY types
pub use phy::{find_first_phy, GenericPhy, LinkEvent, LinkStatus, PhyDriver, PhyInfo};

// Re-export sync types
pub use sync::IrqSignal;

// Re-export smoltcp types when smoltcp is enabled
#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub use integration::smoltcp::{ethernet_address, FrameQueue, SsedDevice};
