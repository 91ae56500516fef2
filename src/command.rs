//! Wire-level command encoding
//!
//! The device speaks a tiny command protocol over SPI. Every exchange starts
//! with a one-byte opcode, optionally followed by a fixed payload. All
//! multi-byte integers are big-endian.
//!
//! | Opcode | Command      | Write payload              | Response              |
//! |--------|--------------|----------------------------|-----------------------|
//! | `0x1`  | `SET_SMI_OP` | op/phy byte, reg/phy byte  | none                  |
//! | `0x2`  | `GET_SMI`    | none                       | 2 bytes               |
//! | `0x3`  | `SET_SMI`    | 16-bit value               | none                  |
//! | `0x4`  | `SET_MAC`    | 6 address bytes            | none                  |
//! | `0x6`  | `SEND_FRAME` | 16-bit length, then frame  | none                  |
//! | `0x7`  | `RECV_FRAME` | none                       | 16-bit length, frame  |
//! | `0x8`  | `GET_IRQ`    | none                       | 1 byte                |
//!
//! # SMI operation layout
//!
//! ```text
//!  byte 0      byte 1                       byte 2
//! +--------+  +-----+----+------------+    +-------------+-----------+
//! | 0x01   |  | 0.. | WR | PHY[4:3]   |    | PHY[2:0]    | REG[4:0]  |
//! +--------+  +-----+----+------------+    +-------------+-----------+
//!                    bit2  bits 1..0          bits 7..5     bits 4..0
//! ```

use crate::constants::{MAC_ADDR_LEN, MAX_PHY_ADDR, MAX_REG_ADDR};
use crate::driver::error::{ConfigError, ConfigResult};

// =============================================================================
// Opcodes
// =============================================================================

/// Command opcodes understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Trigger an SMI read or write operation
    SetSmiOp = 0x1,
    /// Fetch the result of the last SMI read
    GetSmi = 0x2,
    /// Load the data word for the next SMI write
    SetSmi = 0x3,
    /// Program the station MAC address
    SetMac = 0x4,
    /// Send one Ethernet frame
    SendFrame = 0x6,
    /// Receive one Ethernet frame
    RecvFrame = 0x7,
    /// Read and clear the interrupt status
    GetIrq = 0x8,
}

/// Shape of the response a command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Nothing is read back
    None,
    /// A single byte
    Byte,
    /// A big-endian 16-bit word
    Word,
    /// A big-endian 16-bit length followed by that many bytes
    LengthPrefixed,
}

impl Command {
    /// Raw opcode byte
    #[inline(always)]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Decode an opcode byte
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0x1 => Some(Command::SetSmiOp),
            0x2 => Some(Command::GetSmi),
            0x3 => Some(Command::SetSmi),
            0x4 => Some(Command::SetMac),
            0x6 => Some(Command::SendFrame),
            0x7 => Some(Command::RecvFrame),
            0x8 => Some(Command::GetIrq),
            _ => None,
        }
    }

    /// Response shape expected after this command
    pub const fn response(self) -> Response {
        match self {
            Command::SetSmiOp | Command::SetSmi | Command::SetMac | Command::SendFrame => {
                Response::None
            }
            Command::GetSmi => Response::Word,
            Command::RecvFrame => Response::LengthPrefixed,
            Command::GetIrq => Response::Byte,
        }
    }
}

// =============================================================================
// SMI Addressing
// =============================================================================

/// Write-operation select bit in the second SMI_OP byte
pub const SMI_OP_WRITE: u8 = 1 << 2;

/// PHY address bits carried in the second SMI_OP byte
const SMI_PHY_HI_MASK: u8 = 0x03;

/// Shift of the low PHY address bits inside the third SMI_OP byte
const SMI_PHY_LO_SHIFT: u8 = 5;

/// Register index mask inside the third SMI_OP byte
const SMI_REG_MASK: u8 = 0x1F;

/// Direction of an SMI operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmiOp {
    /// Read a PHY register
    Read,
    /// Write a PHY register
    Write,
}

/// Validated (PHY address, register index) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmiAddress {
    phy: u8,
    reg: u8,
}

impl SmiAddress {
    /// Create an address, checking both fields fit in 5 bits
    pub const fn new(phy: u8, reg: u8) -> ConfigResult<Self> {
        if phy > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress);
        }
        if reg > MAX_REG_ADDR {
            return Err(ConfigError::InvalidRegister);
        }
        Ok(Self { phy, reg })
    }

    /// PHY address
    #[inline(always)]
    pub const fn phy(&self) -> u8 {
        self.phy
    }

    /// Register index
    #[inline(always)]
    pub const fn reg(&self) -> u8 {
        self.reg
    }

    /// Encode a `SET_SMI_OP` command for this address
    pub const fn encode(&self, op: SmiOp) -> [u8; 3] {
        let write = match op {
            SmiOp::Read => 0,
            SmiOp::Write => SMI_OP_WRITE,
        };
        [
            Command::SetSmiOp.opcode(),
            write | (self.phy >> 3),
            self.reg | (self.phy << SMI_PHY_LO_SHIFT),
        ]
    }

    /// Decode a `SET_SMI_OP` command
    ///
    /// Returns `None` if the opcode byte is not `SET_SMI_OP`.
    pub const fn decode(bytes: [u8; 3]) -> Option<(SmiOp, Self)> {
        if bytes[0] != Command::SetSmiOp.opcode() {
            return None;
        }
        let op = if bytes[1] & SMI_OP_WRITE != 0 {
            SmiOp::Write
        } else {
            SmiOp::Read
        };
        let phy = ((bytes[1] & SMI_PHY_HI_MASK) << 3) | (bytes[2] >> SMI_PHY_LO_SHIFT);
        let reg = bytes[2] & SMI_REG_MASK;
        Some((op, Self { phy, reg }))
    }
}

/// Encode a `SET_SMI` command carrying the value for the next SMI write
pub const fn encode_smi_data(value: u16) -> [u8; 3] {
    let [hi, lo] = value.to_be_bytes();
    [Command::SetSmi.opcode(), hi, lo]
}

// =============================================================================
// MAC and Frame Commands
// =============================================================================

/// Encode a `SET_MAC` command
pub const fn encode_set_mac(mac: &[u8; MAC_ADDR_LEN]) -> [u8; MAC_ADDR_LEN + 1] {
    [
        Command::SetMac.opcode(),
        mac[0],
        mac[1],
        mac[2],
        mac[3],
        mac[4],
        mac[5],
    ]
}

/// Encode the `SEND_FRAME` header for a frame of `len` bytes
pub const fn encode_frame_header(len: u16) -> [u8; 3] {
    let [hi, lo] = len.to_be_bytes();
    [Command::SendFrame.opcode(), hi, lo]
}

/// Decode a big-endian 16-bit response word
#[inline(always)]
pub const fn decode_word(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_match_device_firmware() {
        assert_eq!(Command::SetSmiOp.opcode(), 0x1);
        assert_eq!(Command::GetSmi.opcode(), 0x2);
        assert_eq!(Command::SetSmi.opcode(), 0x3);
        assert_eq!(Command::SetMac.opcode(), 0x4);
        assert_eq!(Command::SendFrame.opcode(), 0x6);
        assert_eq!(Command::RecvFrame.opcode(), 0x7);
        assert_eq!(Command::GetIrq.opcode(), 0x8);
    }

    #[test]
    fn from_opcode_rejects_unknown() {
        assert_eq!(Command::from_opcode(0x5), None);
        assert_eq!(Command::from_opcode(0x0), None);
        assert_eq!(Command::from_opcode(0x0A), None);
        assert_eq!(Command::from_opcode(0x7), Some(Command::RecvFrame));
    }

    #[test]
    fn response_shapes() {
        assert_eq!(Command::GetIrq.response(), Response::Byte);
        assert_eq!(Command::GetSmi.response(), Response::Word);
        assert_eq!(Command::RecvFrame.response(), Response::LengthPrefixed);
        assert_eq!(Command::SendFrame.response(), Response::None);
    }

    #[test]
    fn smi_address_rejects_out_of_range() {
        assert_eq!(SmiAddress::new(32, 0), Err(ConfigError::InvalidPhyAddress));
        assert_eq!(SmiAddress::new(0, 32), Err(ConfigError::InvalidRegister));
        assert!(SmiAddress::new(31, 31).is_ok());
    }

    #[test]
    fn smi_read_encoding() {
        let addr = SmiAddress::new(3, 5).unwrap();
        assert_eq!(addr.encode(SmiOp::Read), [0x1, 0x0, 0x65]);
    }

    #[test]
    fn smi_write_encoding_sets_op_bit() {
        let addr = SmiAddress::new(3, 5).unwrap();
        assert_eq!(addr.encode(SmiOp::Write), [0x1, 0x4, 0x65]);
    }

    #[test]
    fn smi_high_phy_bits_go_to_second_byte() {
        // PHY 0b11010: high bits 0b11, low bits 0b010
        let addr = SmiAddress::new(0x1A, 0x1F).unwrap();
        assert_eq!(addr.encode(SmiOp::Read), [0x1, 0x03, 0x5F]);
    }

    #[test]
    fn smi_decode_recovers_every_address() {
        for phy in 0..=MAX_PHY_ADDR {
            for reg in [0u8, 1, 17, 31] {
                let addr = SmiAddress::new(phy, reg).unwrap();
                assert_eq!(
                    SmiAddress::decode(addr.encode(SmiOp::Write)),
                    Some((SmiOp::Write, addr))
                );
            }
        }
    }

    #[test]
    fn smi_decode_rejects_other_opcodes() {
        assert_eq!(SmiAddress::decode([0x3, 0x0, 0x65]), None);
    }

    #[test]
    fn smi_data_is_big_endian() {
        assert_eq!(encode_smi_data(0x1234), [0x3, 0x12, 0x34]);
    }

    #[test]
    fn set_mac_encoding() {
        let mac = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];
        assert_eq!(
            encode_set_mac(&mac),
            [0x4, 0x02, 0x11, 0x22, 0x33, 0x44, 0x55]
        );
    }

    #[test]
    fn frame_header_is_big_endian() {
        assert_eq!(encode_frame_header(60), [0x6, 0x00, 0x3C]);
        assert_eq!(encode_frame_header(1514), [0x6, 0x05, 0xEA]);
    }

    #[test]
    fn decode_word_is_big_endian() {
        assert_eq!(decode_word([0x05, 0xEA]), 1514);
        assert_eq!(decode_word([0x00, 0x00]), 0);
    }
}
