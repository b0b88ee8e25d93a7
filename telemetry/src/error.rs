use thiserror::Error;

/// Bring-up failures. All of them are fatal: there is no retry path and the
/// firmware halts when it sees one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("radio stack failed to initialize")]
    RadioInit,
    #[error("sensor controller failed to initialize")]
    SensorInit,
    #[error("sensor task id {0} does not fit the task mask")]
    SensorTaskId(u8),
}
