use core::convert::Infallible;

use embedded_hal::digital::v2::StatefulOutputPin;

use crate::radio::TransmissionResult;

/// Two LEDs: the primary one toggles on every transmission, the secondary
/// one additionally toggles when the transmission failed.
pub struct StatusIndicator<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> StatusIndicator<A, B>
where
    A: StatefulOutputPin<Error = Infallible>,
    B: StatefulOutputPin<Error = Infallible>,
{
    /// Starts with both LEDs off.
    pub fn new(mut primary: A, mut secondary: B) -> Self {
        primary.set_low().unwrap_or_else(|never| match never {});
        secondary.set_low().unwrap_or_else(|never| match never {});
        Self { primary, secondary }
    }

    pub fn indicate(&mut self, result: TransmissionResult) {
        toggle(&mut self.primary);
        if !result.is_success() {
            toggle(&mut self.secondary);
        }
    }

    pub fn release(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

// The pin's output latch is the LED state.
fn toggle<P: StatefulOutputPin<Error = Infallible>>(pin: &mut P) {
    let lit = pin.is_set_high().unwrap_or_else(|never| match never {});
    let set = if lit { pin.set_low() } else { pin.set_high() };
    set.unwrap_or_else(|never| match never {});
}
