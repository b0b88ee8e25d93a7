use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;

/// Bit k is set when input k read high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputBitmask(pub u8);

impl InputBitmask {
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_set(self, input: usize) -> bool {
        self.0 & (1 << input) != 0
    }
}

/// Reads a fixed, ordered set of input lines into one byte.
pub struct DigitalInputSampler<P, const N: usize> {
    pins: [P; N],
}

impl<P, const N: usize> DigitalInputSampler<P, N>
where
    P: InputPin<Error = Infallible>,
{
    const FITS_IN_A_BYTE: () = assert!(N <= 8);

    pub fn new(pins: [P; N]) -> Self {
        let () = Self::FITS_IN_A_BYTE;
        Self { pins }
    }

    pub fn sample(&self) -> InputBitmask {
        let bits = self
            .pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_high().unwrap_or_else(|never| match never {}))
            .fold(0u8, |bits, (k, _)| bits | 1 << k);
        InputBitmask(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct Switch(Rc<Cell<bool>>);

    impl InputPin for Switch {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    fn bank() -> ([Rc<Cell<bool>>; 6], DigitalInputSampler<Switch, 6>) {
        let lines: [Rc<Cell<bool>>; 6] = Default::default();
        let pins = lines.clone().map(Switch);
        (lines, DigitalInputSampler::new(pins))
    }

    #[test]
    fn all_low_reads_zero() {
        let (_, sampler) = bank();
        assert_eq!(sampler.sample(), InputBitmask(0));
    }

    #[test]
    fn first_and_last_lines() {
        let (lines, sampler) = bank();
        lines[0].set(true);
        assert_eq!(sampler.sample().bits(), 0b000001);
        lines[0].set(false);
        lines[5].set(true);
        assert_eq!(sampler.sample().bits(), 0b100000);
    }

    #[test]
    fn tracks_line_changes_between_samples() {
        let (lines, sampler) = bank();
        lines[2].set(true);
        let first = sampler.sample();
        lines[2].set(false);
        let second = sampler.sample();
        assert!(first.is_set(2));
        assert!(!second.is_set(2));
    }

    proptest! {
        #[test]
        fn each_bit_follows_its_own_line(states in 0u8..64) {
            let (lines, sampler) = bank();
            for (k, line) in lines.iter().enumerate() {
                line.set(states & (1 << k) != 0);
            }
            let sampled = sampler.sample();
            prop_assert_eq!(sampled.bits(), states);
            for k in 0..6 {
                prop_assert_eq!(sampled.is_set(k), states & (1 << k) != 0);
            }
        }
    }
}
