use core::fmt::Debug;

use heapless::Vec;
use protocol::{Address, Payload, MAX_PAYLOAD_LEN, PAYLOAD_LEN};

use crate::error::Error;

const _: () = assert!(PAYLOAD_LEN <= MAX_PAYLOAD_LEN);

/// What the radio stack gets handed for one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPacket {
    pub dst_addr: Address,
    /// Radio time to start sending at; `None` sends immediately.
    pub abs_time: Option<u32>,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl TxPacket {
    pub fn immediate(dst_addr: Address, payload: &Payload) -> Self {
        // never empty: the encoded payload always fits, see the assertion above
        let payload = Vec::from_slice(&payload.encode()).unwrap_or_default();
        Self {
            dst_addr,
            abs_time: None,
            payload,
        }
    }
}

/// The radio PHY/MAC stack, reduced to what the transmitter uses.
pub trait RadioLink {
    /// PHY settings: frequency, data rate, power and so on.
    type Params;
    type Error: Debug;

    fn init(&mut self, params: &Self::Params) -> Result<(), Self::Error>;

    fn transmit(&mut self, packet: &TxPacket) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmissionResult {
    Success,
    Failure,
}

impl TransmissionResult {
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// An initialized radio link. Only the worker context transmits.
pub struct RadioTransmitter<R> {
    link: R,
    destination: Address,
}

impl<R: RadioLink> RadioTransmitter<R> {
    /// Brings the radio stack up. Failure here is fatal to the caller.
    pub fn initialize(mut link: R, params: &R::Params, destination: Address) -> Result<Self, Error> {
        match link.init(params) {
            Ok(()) => {
                log_info!("radio up, sending to {:?}", destination);
                Ok(Self { link, destination })
            }
            Err(_) => {
                log_error!("radio init failed");
                Err(Error::RadioInit)
            }
        }
    }

    /// One attempt, no retry: the next wake is the retry.
    pub fn transmit(&mut self, payload: &Payload) -> TransmissionResult {
        let packet = TxPacket::immediate(self.destination, payload);
        match self.link.transmit(&packet) {
            Ok(()) => TransmissionResult::Success,
            Err(_) => {
                log_warn!("transmit failed, seq {}", payload.seq_number());
                TransmissionResult::Failure
            }
        }
    }

    pub fn link(&self) -> &R {
        &self.link
    }
}
