// nRF24L01+ behind the telemetry RadioLink.
//
// Packets go to a group address that any number of receivers listen on, so
// auto-ack and auto-retransmit are off: a transmission succeeds once the
// frame has left the TX FIFO.

use core::convert::Infallible;

use embedded_nrf24l01::{Configuration, DataRate, StandbyMode, NRF24L01};
use stm32f1xx_hal::{
    gpio::{
        gpioa::{PA5, PA6, PA7},
        gpiob::{PB0, PB1},
        Alternate, Floating, Input, Output, PushPull,
    },
    spi::{Spi, Spi1NoRemap},
    pac::SPI1,
};
use telemetry::{RadioLink, TxPacket};

pub type RadioCe = PB0<Output<PushPull>>;
pub type RadioCsn = PB1<Output<PushPull>>;

pub type RadioSpi = Spi<SPI1, Spi1NoRemap,
    (PA5<Alternate<PushPull>>,
     PA6<Input<Floating>>,
     PA7<Alternate<PushPull>>)>;

type Radio = NRF24L01<Infallible, RadioCe, RadioCsn, RadioSpi>;

pub struct Nrf24Params {
    pub channel: u8,
    pub data_rate: DataRate,
    /// 0 (-18dBm) to 3 (0dBm)
    pub power: u8,
}

impl Default for Nrf24Params {
    fn default() -> Self {
        Self {
            channel: protocol::RADIO_CHANNEL,
            data_rate: DataRate::R250Kbps,
            power: 3,
        }
    }
}

#[derive(Debug, defmt::Format)]
pub enum LinkError {
    AlreadyInitialized,
    NotConnected,
    NotInitialized,
    Spi,
    ScheduledSendUnsupported,
    MaxRetransmits,
}

pub struct Nrf24Link {
    parts: Option<(RadioCe, RadioCsn, RadioSpi)>,
    // None after a failed return to standby; the radio is gone until reset
    standby: Option<StandbyMode<Radio>>,
}

impl Nrf24Link {
    pub fn new(ce: RadioCe, csn: RadioCsn, spi: RadioSpi) -> Self {
        Self { parts: Some((ce, csn, spi)), standby: None }
    }
}

impl RadioLink for Nrf24Link {
    type Params = Nrf24Params;
    type Error = LinkError;

    fn init(&mut self, params: &Nrf24Params) -> Result<(), LinkError> {
        let (ce, csn, spi) = self.parts.take().ok_or(LinkError::AlreadyInitialized)?;
        let mut radio = NRF24L01::new(ce, csn, spi).map_err(|_| LinkError::NotConnected)?;

        radio.set_frequency(params.channel).map_err(|_| LinkError::Spi)?;
        radio.set_rf(&params.data_rate, params.power).map_err(|_| LinkError::Spi)?;
        radio.set_auto_ack(&[false; 6]).map_err(|_| LinkError::Spi)?;
        radio.set_auto_retransmit(0, 0).map_err(|_| LinkError::Spi)?;
        radio.flush_tx().map_err(|_| LinkError::Spi)?;

        self.standby = Some(radio);
        Ok(())
    }

    fn transmit(&mut self, packet: &TxPacket) -> Result<(), LinkError> {
        if packet.abs_time.is_some() {
            return Err(LinkError::ScheduledSendUnsupported);
        }

        let mut standby = self.standby.take().ok_or(LinkError::NotInitialized)?;
        if standby.set_tx_addr(&packet.dst_addr.pipe_address()).is_err() {
            self.standby = Some(standby);
            return Err(LinkError::Spi);
        }

        // a failed switch to TX hands back the bare device, not standby
        let mut tx = standby.tx().map_err(|_| LinkError::Spi)?;

        let sent = match tx.send(&packet.payload) {
            Ok(()) => nb::block!(tx.poll_send()).map_err(|_| LinkError::Spi),
            Err(_) => Err(LinkError::Spi),
        };

        self.standby = Some(tx.standby().map_err(|_| LinkError::NotInitialized)?);

        match sent {
            Ok(true) => Ok(()),
            Ok(false) => Err(LinkError::MaxRetransmits),
            Err(error) => Err(error),
        }
    }
}
