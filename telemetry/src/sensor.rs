use core::fmt::Debug;

use crate::error::Error;
use crate::wake::WakeSignal;

/// Events the sensing coprocessor delivers to the main core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorEvent {
    /// A non-blocking task control operation completed.
    ControlReady,
    /// A coprocessor task raised an alert ("target hit").
    TaskAlert,
}

/// Driver for the sensing coprocessor. Its program is a black box; the main
/// core only starts it and acknowledges its alerts.
///
/// `subscribe` arms delivery of an event kind. Delivered events reach the
/// monitor through [`SensorMonitor::dispatch`], called by whatever interrupt
/// handler the platform routes the coprocessor to.
pub trait SensorDriver {
    type Error: Debug;

    fn osal_init(&mut self);

    fn subscribe(&mut self, event: SensorEvent);

    fn init(&mut self) -> Result<(), Self::Error>;

    fn start_tasks(&mut self, task_mask: u32) -> Result<(), Self::Error>;

    fn clear_alert_interrupt_source(&mut self);

    fn acknowledge_alert_events(&mut self);
}

/// Runs in interrupt context: keeps the coprocessor acknowledged and turns
/// every alert into one wake for the worker.
pub struct SensorMonitor<'a, D> {
    driver: D,
    wake: &'a WakeSignal,
}

impl<'a, D: SensorDriver> SensorMonitor<'a, D> {
    pub fn start(mut driver: D, wake: &'a WakeSignal, task_mask: u32) -> Result<Self, Error> {
        driver.osal_init();
        driver.subscribe(SensorEvent::ControlReady);
        driver.subscribe(SensorEvent::TaskAlert);

        if driver.init().is_err() {
            log_error!("sensor controller init failed");
            return Err(Error::SensorInit);
        }
        if driver.start_tasks(task_mask).is_err() {
            log_error!("sensor task start failed, mask {}", task_mask);
            return Err(Error::SensorInit);
        }
        log_info!("sensor tasks started, mask {}", task_mask);

        Ok(Self { driver, wake })
    }

    /// Interrupt context only. No blocking, no logging.
    pub fn dispatch(&mut self, event: SensorEvent) {
        match event {
            // reserved for non-blocking task control
            SensorEvent::ControlReady => {}
            SensorEvent::TaskAlert => {
                // acknowledge before waking, so no wake is ever delivered for
                // an event the driver still considers pending
                self.driver.clear_alert_interrupt_source();
                self.driver.acknowledge_alert_events();
                self.wake.post();
            }
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        OsalInit,
        Subscribe(SensorEvent),
        Init,
        StartTasks(u32),
        ClearAlert { pending_wakes: usize },
        Ack { pending_wakes: usize },
    }

    struct Recorder<'a> {
        wake: &'a WakeSignal,
        calls: Vec<Call>,
        fail_init: bool,
    }

    impl<'a> Recorder<'a> {
        fn new(wake: &'a WakeSignal) -> Self {
            Self { wake, calls: Vec::new(), fail_init: false }
        }
    }

    impl SensorDriver for Recorder<'_> {
        type Error = ();

        fn osal_init(&mut self) {
            self.calls.push(Call::OsalInit);
        }

        fn subscribe(&mut self, event: SensorEvent) {
            self.calls.push(Call::Subscribe(event));
        }

        fn init(&mut self) -> Result<(), ()> {
            self.calls.push(Call::Init);
            if self.fail_init {
                Err(())
            } else {
                Ok(())
            }
        }

        fn start_tasks(&mut self, task_mask: u32) -> Result<(), ()> {
            self.calls.push(Call::StartTasks(task_mask));
            Ok(())
        }

        fn clear_alert_interrupt_source(&mut self) {
            self.calls.push(Call::ClearAlert { pending_wakes: self.wake.pending() });
        }

        fn acknowledge_alert_events(&mut self) {
            self.calls.push(Call::Ack { pending_wakes: self.wake.pending() });
        }
    }

    #[test]
    fn start_sequence() {
        let wake = WakeSignal::new();
        let monitor = SensorMonitor::start(Recorder::new(&wake), &wake, 0b1).unwrap();
        assert_eq!(
            monitor.driver().calls,
            [
                Call::OsalInit,
                Call::Subscribe(SensorEvent::ControlReady),
                Call::Subscribe(SensorEvent::TaskAlert),
                Call::Init,
                Call::StartTasks(0b1),
            ]
        );
        assert_eq!(wake.pending(), 0);
    }

    #[test]
    fn init_failure_is_reported() {
        let wake = WakeSignal::new();
        let mut driver = Recorder::new(&wake);
        driver.fail_init = true;
        let monitor = SensorMonitor::start(driver, &wake, 0b1);
        assert_eq!(monitor.err(), Some(Error::SensorInit));
    }

    #[test]
    fn alert_acknowledges_then_wakes() {
        let wake = WakeSignal::new();
        let mut monitor = SensorMonitor::start(Recorder::new(&wake), &wake, 0b1).unwrap();

        monitor.dispatch(SensorEvent::TaskAlert);

        assert_eq!(
            monitor.driver().calls[5..],
            [
                Call::ClearAlert { pending_wakes: 0 },
                Call::Ack { pending_wakes: 0 },
            ]
        );
        assert_eq!(wake.pending(), 1);
    }

    #[test]
    fn control_ready_does_nothing() {
        let wake = WakeSignal::new();
        let mut monitor = SensorMonitor::start(Recorder::new(&wake), &wake, 0b1).unwrap();

        monitor.dispatch(SensorEvent::ControlReady);

        assert_eq!(monitor.driver().calls.len(), 5);
        assert_eq!(wake.pending(), 0);
    }

    #[test]
    fn burst_of_alerts_queues_one_wake_each() {
        let wake = WakeSignal::new();
        let mut monitor = SensorMonitor::start(Recorder::new(&wake), &wake, 0b1).unwrap();

        for _ in 0..5 {
            monitor.dispatch(SensorEvent::TaskAlert);
        }

        assert_eq!(wake.pending(), 5);
    }
}
