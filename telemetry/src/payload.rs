use protocol::Payload;

use crate::identity::DeviceIdentity;
use crate::inputs::InputBitmask;

/// Owns the running sequence number. Lives in the worker context only.
#[derive(Debug)]
pub struct PayloadBuilder {
    identity: DeviceIdentity,
    seq_number: u16,
}

impl PayloadBuilder {
    pub const fn new(identity: DeviceIdentity) -> Self {
        Self::starting_at(identity, 0)
    }

    pub const fn starting_at(identity: DeviceIdentity, seq_number: u16) -> Self {
        Self { identity, seq_number }
    }

    /// Sequence number of the last payload built.
    pub const fn seq_number(&self) -> u16 {
        self.seq_number
    }

    pub const fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Advances the sequence number and stamps the sampled inputs.
    pub fn next(&mut self, inputs: InputBitmask) -> Payload {
        self.seq_number = self.seq_number.wrapping_add(1);
        Payload::new(self.seq_number, self.identity.value(), inputs.bits())
    }
}
