use protocol::{Address, DESTINATION_ADDRESS};

use crate::error::Error;

/// Number of dip switch lines folded into every payload.
pub const DIP_SWITCH_COUNT: usize = 6;

/// Task slot of the "target hit" program on the sensing coprocessor.
pub const TARGET_HIT_SENSOR_TASK_ID: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitterConfig {
    pub destination: Address,
    pub sensor_task_id: u8,
}

impl TransmitterConfig {
    /// One bit per coprocessor task slot, so only ids below 32 exist.
    pub fn sensor_task_mask(&self) -> Result<u32, Error> {
        1u32.checked_shl(u32::from(self.sensor_task_id))
            .ok_or(Error::SensorTaskId(self.sensor_task_id))
    }
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            destination: DESTINATION_ADDRESS,
            sensor_task_id: TARGET_HIT_SENSOR_TASK_ID,
        }
    }
}
