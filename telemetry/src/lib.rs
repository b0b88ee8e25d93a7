//! Event-triggered telemetry for a target-hit transmitter.
//!
//! An external sensing coprocessor raises an alert from interrupt context.
//! [`SensorMonitor`] acknowledges it and posts to a [`WakeSignal`]; the
//! [`Worker`] blocks on that signal, samples the dip switches, builds the next
//! [`protocol::Payload`], transmits it and shows the outcome on two LEDs.
//!
//! Everything here is hardware-agnostic: pins come in through `embedded-hal`,
//! the radio through [`RadioLink`] and the coprocessor through [`SensorDriver`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logging;

pub mod config;
pub mod error;
pub mod identity;
pub mod indicator;
pub mod inputs;
pub mod payload;
pub mod radio;
pub mod sensor;
pub mod wake;
pub mod worker;

pub use config::TransmitterConfig;
pub use error::Error;
pub use identity::{DeviceIdentity, UniqueIdSource};
pub use indicator::StatusIndicator;
pub use inputs::{DigitalInputSampler, InputBitmask};
pub use payload::PayloadBuilder;
pub use radio::{RadioLink, RadioTransmitter, TransmissionResult, TxPacket};
pub use sensor::{SensorDriver, SensorEvent, SensorMonitor};
pub use wake::{Idle, SpinIdle, WakeSignal};
pub use worker::{Cycle, Parts, Worker, WorkerState};
