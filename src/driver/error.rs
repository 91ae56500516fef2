//! Error types for the SSED driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Configuration and argument validation failures
//! - [`IoError`]: Bus transfer and frame path failures
//! - [`TxError`]: Misuse of the single-slot transmit resource
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

use embedded_hal::spi::ErrorKind;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and argument errors
///
/// These errors are detected before anything is sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Invalid PHY register index (must be 0-31)
    InvalidRegister,
    /// MAC address is multicast or all zeroes
    InvalidMacAddress,
    /// Operation not allowed while the network interface is running
    InterfaceRunning,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidRegister => "invalid PHY register",
            ConfigError::InvalidMacAddress => "invalid MAC address",
            ConfigError::InterfaceRunning => "interface is running",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime bus and frame errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// SPI write or read failed at the transport
    Bus(ErrorKind),
    /// Frame exceeds the maximum frame size
    FrameTooLarge,
    /// No buffer available to hold a received frame
    OutOfMemory,
    /// PHY communication error
    PhyError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Bus(_) => "SPI transfer failed",
            IoError::FrameTooLarge => "frame too large",
            IoError::OutOfMemory => "out of memory",
            IoError::PhyError => "PHY communication error",
        }
    }

    /// Map any SPI error into a bus error
    pub fn from_spi<E: embedded_hal::spi::Error>(err: E) -> Self {
        IoError::Bus(err.kind())
    }
}

// =============================================================================
// Transmit Errors
// =============================================================================

/// Transmit slot errors
///
/// The device accepts one frame at a time. These signal a caller that
/// did not respect the stopped queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// A frame is already in flight
    Busy,
    /// Completion reported while no frame is in flight
    NoFrameInFlight,
}

impl core::fmt::Display for TxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TxError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TxError::Busy => "transmit slot busy",
            TxError::NoFrameInFlight => "no frame in flight",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match ssed.submit(&mut net, frame) {
///     Err(Error::Tx(TxError::Busy)) => { /* queue should have been stopped */ }
///     Err(Error::Io(IoError::Bus(kind))) => { /* transport failure */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
    /// Transmit slot error
    Tx(TxError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
            Error::Tx(e) => write!(f, "tx: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<TxError> for Error {
    fn from(e: TxError) -> Self {
        Error::Tx(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

/// Result type alias for transmit slot operations
pub type TxResult<T> = core::result::Result<T, TxError>;

// =============================================================================
// Unit Tests
// =============================================================================
