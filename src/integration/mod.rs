//! External Stack Integrations
//!
//! This module provides integrations with external network stacks:
//!
//! - **smoltcp** (`smoltcp`): Integration with the smoltcp TCP/IP network stack
//!   - [`FrameQueue`](smoltcp::FrameQueue) implements the driver's `NetInterface`
//!   - Implements `smoltcp::phy::Device` over a shared driver
//!   - Requires `smoltcp` feature
//!
//! # Example
//!
//! ```ignore
//! use ph_ssed::integration::smoltcp::SsedDevice;
//! use smoltcp::phy::Device;
//!
//! let mut device: SsedDevice<'_, _, _, 4> = SsedDevice::new(&ssed);
//! let _ = device.capabilities();
//! ```

#[cfg(feature = "smoltcp")]
pub mod smoltcp;

#[cfg(feature = "smoltcp")]
pub use smoltcp::{ethernet_address, FrameQueue, SsedDevice, SsedRxToken, SsedTxToken};
