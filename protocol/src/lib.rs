#![no_std]

use thiserror::Error;

/// The receivers' address filter accepts packets sent to this address.
pub const DESTINATION_ADDRESS: Address = Address(0xAA);

pub const RADIO_CHANNEL: u8 = 76;

// nRF24 pipes need at least 3 address bytes; the group address goes first,
// the rest is fixed for every unit in the field.
pub const PIPE_ADDRESS_PREFIX: [u8; 4] = [b'R', b'N', b'G', b'R'];

// Largest frame the radio will carry in one packet.
pub const MAX_PAYLOAD_LEN: usize = 32;

// Each packet is tightly packed, little-endian:
//   sequence number  2 bytes
//   target id        8 bytes, only the low 48 bits are used
//   dip switches     1 byte, only the low 6 bits are used
pub const PAYLOAD_LEN: usize = 2 + 8 + 1;

pub const TARGET_ID_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;
pub const DIP_SWITCH_MASK: u8 = 0b0011_1111;

const SEQ_OFFSET: usize = 0;
const TARGET_ID_OFFSET: usize = 2;
const DIP_SWITCH_OFFSET: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(pub u8);

impl Address {
    pub const fn pipe_address(self) -> [u8; 5] {
        let [a, b, c, d] = PIPE_ADDRESS_PREFIX;
        [self.0, a, b, c, d]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    #[error("payload is {0} bytes, expected {len}", len = PAYLOAD_LEN)]
    Length(usize),
    #[error("reserved bits set in the {0} field")]
    ReservedBits(&'static str),
}

/// One "target hit" report as it goes over the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload {
    seq_number: u16,
    target_id: u64,
    dip_switch_state: u8,
}

impl Payload {
    /// Bits outside the target id and dip switch fields are dropped so the
    /// reserved parts of the frame always go out as zero.
    pub const fn new(seq_number: u16, target_id: u64, dip_switch_state: u8) -> Self {
        Self {
            seq_number,
            target_id: target_id & TARGET_ID_MASK,
            dip_switch_state: dip_switch_state & DIP_SWITCH_MASK,
        }
    }

    pub const fn seq_number(&self) -> u16 {
        self.seq_number
    }

    pub const fn target_id(&self) -> u64 {
        self.target_id
    }

    pub const fn dip_switch_state(&self) -> u8 {
        self.dip_switch_state
    }

    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut buf = [0u8; PAYLOAD_LEN];
        buf[SEQ_OFFSET..TARGET_ID_OFFSET].copy_from_slice(&self.seq_number.to_le_bytes());
        buf[TARGET_ID_OFFSET..DIP_SWITCH_OFFSET].copy_from_slice(&self.target_id.to_le_bytes());
        buf[DIP_SWITCH_OFFSET] = self.dip_switch_state;
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(DecodeError::Length(bytes.len()));
        }

        let mut seq = [0u8; 2];
        seq.copy_from_slice(&bytes[SEQ_OFFSET..TARGET_ID_OFFSET]);
        let mut target = [0u8; 8];
        target.copy_from_slice(&bytes[TARGET_ID_OFFSET..DIP_SWITCH_OFFSET]);

        let target_id = u64::from_le_bytes(target);
        if target_id & !TARGET_ID_MASK != 0 {
            return Err(DecodeError::ReservedBits("target id"));
        }
        let dip_switch_state = bytes[DIP_SWITCH_OFFSET];
        if dip_switch_state & !DIP_SWITCH_MASK != 0 {
            return Err(DecodeError::ReservedBits("dip switch"));
        }

        Ok(Self {
            seq_number: u16::from_le_bytes(seq),
            target_id,
            dip_switch_state,
        })
    }
}
