use protocol::TARGET_ID_MASK;

/// Read-only storage holding a value unique to this chip, e.g. a factory
/// programmed MAC address or the MCU's unique device id.
pub trait UniqueIdSource {
    fn read_unique_id(&self) -> u64;
}

/// 48-bit identity carried in every payload. Read once at startup and never
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity(u64);

impl DeviceIdentity {
    pub fn read(source: &impl UniqueIdSource) -> Self {
        Self::from_raw(source.read_unique_id())
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw & TARGET_ID_MASK)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}
