//! Configuration types for the SSED driver

use super::error::{ConfigError, ConfigResult};
use crate::constants::{
    COMMAND_SETTLE_US, DEFAULT_MAC_ADDR, MAC_ADDR_LEN, SMI_SETTLE_US, TX_TIMEOUT_MS,
};

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    #[default]
    Mbps100,
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// Settle delays inserted between a write and the following read
///
/// The device has no readiness handshake; the driver waits a fixed time
/// for it to process each command. Both values are in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettleTiming {
    /// Delay after a plain command before reading its response
    pub command_us: u32,
    /// Delay after triggering an SMI read before fetching the result
    pub smi_us: u32,
}

impl SettleTiming {
    /// Timing the device firmware requires (25 us / 1 ms)
    pub const fn new() -> Self {
        Self {
            command_us: COMMAND_SETTLE_US,
            smi_us: SMI_SETTLE_US,
        }
    }

    /// No delays at all, for simulated devices
    pub const fn immediate() -> Self {
        Self {
            command_us: 0,
            smi_us: 0,
        }
    }

    /// Set the command settle delay
    #[must_use]
    pub const fn with_command_us(mut self, us: u32) -> Self {
        self.command_us = us;
        self
    }

    /// Set the SMI settle delay
    #[must_use]
    pub const fn with_smi_us(mut self, us: u32) -> Self {
        self.smi_us = us;
        self
    }
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Driver configuration
///
/// # Example
///
/// ```ignore
/// let config = SsedConfig::new()
///     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
///     .with_tx_timeout_ms(20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SsedConfig {
    /// Station MAC address pushed to the device by [`init`](crate::Ssed::init)
    pub mac_address: [u8; MAC_ADDR_LEN],
    /// Bus settle delays
    pub timing: SettleTiming,
    /// Transmit watchdog timeout in milliseconds
    pub tx_timeout_ms: u32,
}

impl SsedConfig {
    /// Default configuration (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            timing: SettleTiming::new(),
            tx_timeout_ms: TX_TIMEOUT_MS,
        }
    }

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, mac: [u8; MAC_ADDR_LEN]) -> Self {
        self.mac_address = mac;
        self
    }

    /// Set the settle timing
    #[must_use]
    pub const fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Set the transmit watchdog timeout
    #[must_use]
    pub const fn with_tx_timeout_ms(mut self, ms: u32) -> Self {
        self.tx_timeout_ms = ms;
        self
    }

    /// Check the configuration for values the driver cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tx_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        validate_mac_address(&self.mac_address)
    }
}

impl Default for SsedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject multicast and all-zero addresses
pub fn validate_mac_address(mac: &[u8; MAC_ADDR_LEN]) -> ConfigResult<()> {
    let multicast = mac[0] & 0x01 != 0;
    let zero = mac.iter().all(|&b| b == 0);
    if multicast || zero {
        return Err(ConfigError::InvalidMacAddress);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
