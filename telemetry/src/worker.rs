//! The transmit worker.
//!
//! ```text
//! WaitForWake -> Sample -> Build -> Transmit -> Indicate -> WaitForWake ...
//! ```
//!
//! There is no terminal state. A failed transmission still goes through
//! `Indicate` (both LEDs toggle) and the sequence number has already moved
//! on by then, so the next wake is the retry.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, StatefulOutputPin};
use protocol::Payload;

use crate::config::{TransmitterConfig, DIP_SWITCH_COUNT};
use crate::error::Error;
use crate::identity::{DeviceIdentity, UniqueIdSource};
use crate::indicator::StatusIndicator;
use crate::inputs::{DigitalInputSampler, InputBitmask};
use crate::payload::PayloadBuilder;
use crate::radio::{RadioLink, RadioTransmitter, TransmissionResult};
use crate::wake::{Idle, WakeSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerState {
    WaitForWake,
    Sample,
    Build(InputBitmask),
    Transmit(Payload),
    Indicate(Payload, TransmissionResult),
}

/// Outcome of one full wake cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    pub payload: Payload,
    pub result: TransmissionResult,
}

/// Everything the worker needs before the radio is up.
pub struct Parts<'a, P, R: RadioLink, A, B, U, I> {
    pub config: TransmitterConfig,
    pub wake: &'a WakeSignal,
    pub idle: I,
    pub unique_id: U,
    pub dip_switches: [P; DIP_SWITCH_COUNT],
    pub radio: R,
    pub radio_params: R::Params,
    pub leds: (A, B),
}

pub struct Worker<'a, P, R, A, B, I> {
    wake: &'a WakeSignal,
    idle: I,
    sampler: DigitalInputSampler<P, DIP_SWITCH_COUNT>,
    builder: PayloadBuilder,
    radio: RadioTransmitter<R>,
    indicator: StatusIndicator<A, B>,
    state: WorkerState,
}

impl<'a, P, R, A, B, I> Worker<'a, P, R, A, B, I>
where
    P: InputPin<Error = Infallible>,
    R: RadioLink,
    A: StatefulOutputPin<Error = Infallible>,
    B: StatefulOutputPin<Error = Infallible>,
    I: Idle,
{
    pub fn new(
        wake: &'a WakeSignal,
        idle: I,
        sampler: DigitalInputSampler<P, DIP_SWITCH_COUNT>,
        builder: PayloadBuilder,
        radio: RadioTransmitter<R>,
        indicator: StatusIndicator<A, B>,
    ) -> Self {
        Self {
            wake,
            idle,
            sampler,
            builder,
            radio,
            indicator,
            state: WorkerState::WaitForWake,
        }
    }

    /// Startup: LEDs off, identity latched, radio up. A radio failure is
    /// returned before the worker ever waits.
    pub fn bring_up<U: UniqueIdSource>(parts: Parts<'a, P, R, A, B, U, I>) -> Result<Self, Error> {
        let Parts {
            config,
            wake,
            idle,
            unique_id,
            dip_switches,
            radio,
            radio_params,
            leds: (primary, secondary),
        } = parts;

        let indicator = StatusIndicator::new(primary, secondary);
        let identity = DeviceIdentity::read(&unique_id);
        log_info!("target id {}", identity.value());

        let radio = RadioTransmitter::initialize(radio, &radio_params, config.destination)?;

        Ok(Self::new(
            wake,
            idle,
            DigitalInputSampler::new(dip_switches),
            PayloadBuilder::new(identity),
            radio,
            indicator,
        ))
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn identity(&self) -> DeviceIdentity {
        self.builder.identity()
    }

    pub fn seq_number(&self) -> u16 {
        self.builder.seq_number()
    }

    /// Performs the work of the current state and moves to the next one.
    /// Blocks only in `WaitForWake`.
    pub fn step(&mut self) -> WorkerState {
        self.state = match self.state {
            WorkerState::WaitForWake => {
                self.wake.wait(&mut self.idle);
                log_trace!("woken, {} more pending", self.wake.pending());
                WorkerState::Sample
            }
            WorkerState::Sample => WorkerState::Build(self.sampler.sample()),
            WorkerState::Build(inputs) => WorkerState::Transmit(self.builder.next(inputs)),
            WorkerState::Transmit(payload) => {
                let result = self.radio.transmit(&payload);
                WorkerState::Indicate(payload, result)
            }
            WorkerState::Indicate(payload, result) => {
                self.indicator.indicate(result);
                log_debug!(
                    "seq {} inputs {} {:?}",
                    payload.seq_number(),
                    payload.dip_switch_state(),
                    result
                );
                WorkerState::WaitForWake
            }
        };
        self.state
    }

    /// Runs until the current cycle has been indicated, waiting for a wake
    /// first if the worker is idle.
    pub fn run_cycle(&mut self) -> Cycle {
        loop {
            if let WorkerState::Indicate(payload, result) = self.state {
                self.step();
                return Cycle { payload, result };
            }
            self.step();
        }
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.run_cycle();
        }
    }
}
