#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin};
use telemetry::config::DIP_SWITCH_COUNT;
use telemetry::{
    Idle, Parts, RadioLink, TransmitterConfig, TxPacket, UniqueIdSource, WakeSignal, Worker,
};

pub const FACTORY_ID: u64 = 0xFFEE_00A1_B2C3_D4E5;

#[derive(Clone, Default)]
pub struct Line(pub Rc<Cell<bool>>);

impl InputPin for Line {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

#[derive(Clone, Default)]
pub struct Led(pub Rc<Cell<bool>>);

impl OutputPin for Led {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

impl StatefulOutputPin for Led {
    fn is_set_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_set_low(&self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

/// Records every packet and fails the transmissions whose 1-based index is
/// listed in `fail_on`.
#[derive(Clone, Default)]
pub struct ScriptedRadio {
    pub fail_init: bool,
    pub fail_on: HashSet<usize>,
    pub inits: Rc<Cell<u32>>,
    pub sent: Rc<RefCell<Vec<TxPacket>>>,
}

impl RadioLink for ScriptedRadio {
    type Params = u8;
    type Error = &'static str;

    fn init(&mut self, _channel: &u8) -> Result<(), Self::Error> {
        self.inits.set(self.inits.get() + 1);
        if self.fail_init {
            Err("radio not responding")
        } else {
            Ok(())
        }
    }

    fn transmit(&mut self, packet: &TxPacket) -> Result<(), Self::Error> {
        self.sent.borrow_mut().push(packet.clone());
        if self.fail_on.contains(&self.sent.borrow().len()) {
            Err("channel busy")
        } else {
            Ok(())
        }
    }
}

pub struct Fuse(pub u64);

impl UniqueIdSource for Fuse {
    fn read_unique_id(&self) -> u64 {
        self.0
    }
}

/// For tests that post before stepping: reaching it means the worker was
/// about to block on a wake that should already have been there.
pub struct MustNotBlock;

impl Idle for MustNotBlock {
    fn idle(&mut self) {
        panic!("worker blocked with no wake pending");
    }
}

pub struct Bench {
    pub switches: [Line; DIP_SWITCH_COUNT],
    pub primary: Led,
    pub secondary: Led,
    pub radio: ScriptedRadio,
}

pub type BenchWorker<'a, I> = Worker<'a, Line, ScriptedRadio, Led, Led, I>;

impl Bench {
    pub fn new() -> Self {
        Self {
            switches: Default::default(),
            primary: Led::default(),
            secondary: Led::default(),
            radio: ScriptedRadio::default(),
        }
    }

    pub fn set_switches(&self, bits: u8) {
        for (k, line) in self.switches.iter().enumerate() {
            line.0.set(bits & (1 << k) != 0);
        }
    }

    pub fn leds(&self) -> (bool, bool) {
        (self.primary.0.get(), self.secondary.0.get())
    }

    pub fn parts<'a, I: Idle>(
        &self,
        wake: &'a WakeSignal,
        idle: I,
    ) -> Parts<'a, Line, ScriptedRadio, Led, Led, Fuse, I> {
        Parts {
            config: TransmitterConfig::default(),
            wake,
            idle,
            unique_id: Fuse(FACTORY_ID),
            dip_switches: self.switches.clone(),
            radio: self.radio.clone(),
            radio_params: protocol::RADIO_CHANNEL,
            leds: (self.primary.clone(), self.secondary.clone()),
        }
    }

    pub fn worker<'a, I: Idle>(&self, wake: &'a WakeSignal, idle: I) -> BenchWorker<'a, I> {
        match Worker::bring_up(self.parts(wake, idle)) {
            Ok(worker) => worker,
            Err(error) => panic!("bring-up failed: {error}"),
        }
    }
}
