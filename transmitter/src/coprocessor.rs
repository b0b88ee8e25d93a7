// The "target hit" sensing element is a separate low-power part running its
// own program. On this board it is wired with three lines:
//
//   PA0  ALERT   in,  rising edge = hit detected (EXTI0)
//   PA1  ACK     out, pulse high to acknowledge the alert
//   PA2  ENABLE  out, high while its sensing task runs

use embedded_hal::digital::v2::OutputPin;
use stm32f1xx_hal::{
    gpio::{
        gpioa::{PA0, PA1, PA2},
        Edge, ExtiPin, Input, Output, PullDown, PushPull,
    },
    pac::EXTI,
};
use telemetry::config::TARGET_HIT_SENSOR_TASK_ID;
use telemetry::{SensorDriver, SensorEvent};

#[derive(Debug, defmt::Format)]
pub enum CoprocessorError {
    UnknownTasks(u32),
}

pub struct Coprocessor {
    alert: PA0<Input<PullDown>>,
    ack: PA1<Output<PushPull>>,
    enable: PA2<Output<PushPull>>,
    exti: EXTI,
}

impl Coprocessor {
    /// `alert` must already be routed to EXTI0.
    pub fn new(
        alert: PA0<Input<PullDown>>,
        ack: PA1<Output<PushPull>>,
        enable: PA2<Output<PushPull>>,
        exti: EXTI,
    ) -> Self {
        Self { alert, ack, enable, exti }
    }
}

impl SensorDriver for Coprocessor {
    type Error = CoprocessorError;

    fn osal_init(&mut self) {
        self.ack.set_low().ok();
        self.enable.set_low().ok();
        self.alert.clear_interrupt_pending_bit();
    }

    fn subscribe(&mut self, event: SensorEvent) {
        match event {
            // no line for it on this board
            SensorEvent::ControlReady => {}
            SensorEvent::TaskAlert => self.alert.enable_interrupt(&self.exti),
        }
    }

    fn init(&mut self) -> Result<(), CoprocessorError> {
        self.alert.trigger_on_edge(&self.exti, Edge::RISING);
        Ok(())
    }

    fn start_tasks(&mut self, task_mask: u32) -> Result<(), CoprocessorError> {
        if task_mask != 1 << TARGET_HIT_SENSOR_TASK_ID {
            return Err(CoprocessorError::UnknownTasks(task_mask));
        }
        self.enable.set_high().ok();
        Ok(())
    }

    fn clear_alert_interrupt_source(&mut self) {
        self.alert.clear_interrupt_pending_bit();
    }

    fn acknowledge_alert_events(&mut self) {
        self.ack.set_high().ok();
        self.ack.set_low().ok();
    }
}
