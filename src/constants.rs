//! Centralized Constants
//!
//! This module provides a single source of truth for the frame sizes, timing
//! defaults and addresses used throughout the SSED driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame sizes**: Ethernet frame dimensions as seen on the SPI link
//! - **Timing**: Settle delays and the transmit watchdog
//! - **MAC address**: Defaults for the device address
//!
//! # Note
//!
//! Wire opcodes and bit layouts live in [`crate::command`], next to their
//! encoders.

// =============================================================================
// Frame Sizes
// =============================================================================

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: usize = 1500;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// Maximum frame size exchanged with the device (header + payload, no FCS)
pub const MAX_FRAME_SIZE: usize = ETH_HEADER_SIZE + MTU;

/// Minimum Ethernet frame size (excluding CRC)
///
/// Shorter frames are zero-padded to this length before transmission.
pub const MIN_FRAME_SIZE: usize = 60;

// =============================================================================
// Timing
// =============================================================================

/// Settle time between a command write and its response read, in microseconds
pub const COMMAND_SETTLE_US: u32 = 25;

/// Settle time for an SMI transfer on the remote side, in microseconds
pub const SMI_SETTLE_US: u32 = 1_000;

/// Transmit watchdog timeout in milliseconds
pub const TX_TIMEOUT_MS: u32 = 10;

// =============================================================================
// MAC Address
// =============================================================================

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// Default locally-administered MAC address
/// Bit 1 of first byte = 1 indicates locally administered
/// Bit 0 of first byte = 0 indicates unicast
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

// =============================================================================
// PHY Bus
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;
