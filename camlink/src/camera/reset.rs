// camlink-rs/camlink/src/camera/reset.rs
//! Hardware reset line of the camera module.

use crate::Result;

/// Time the reset line is held low during a pulse.
pub const DEFAULT_RESET_HOLD_MS: u32 = 250;

/// Something that can pulse the camera's reset input (active low).
pub trait ResetLine {
    /// Drive the line low, hold it, release it high again. Blocks for the
    /// whole pulse.
    fn pulse(&mut self) -> Result<()>;
}

impl<R: ResetLine + ?Sized> ResetLine for &mut R {
    fn pulse(&mut self) -> Result<()> {
        (**self).pulse()
    }
}

/// Reset line that only counts pulses. Used where no reset pin is wired and
/// in tests.
#[derive(Debug, Default, Clone)]
pub struct CountingReset {
    /// Pulses issued so far
    pub pulses: u32,
}

impl CountingReset {
    /// No pulses yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResetLine for CountingReset {
    fn pulse(&mut self) -> Result<()> {
        self.pulses += 1;
        Ok(())
    }
}

#[cfg(feature = "hal")]
pub use gpio::GpioReset;

#[cfg(feature = "hal")]
mod gpio {
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::OutputPin;

    use super::{DEFAULT_RESET_HOLD_MS, ResetLine};
    use crate::{Error, Result};

    /// Reset pulse on a GPIO output pin.
    pub struct GpioReset<P, D> {
        pin: P,
        delay: D,
        hold_ms: u32,
    }

    impl<P: OutputPin, D: DelayNs> GpioReset<P, D> {
        /// Reset on `pin`, timed by `delay`.
        pub fn new(pin: P, delay: D) -> Self {
            Self {
                pin,
                delay,
                hold_ms: DEFAULT_RESET_HOLD_MS,
            }
        }

        /// How long the line is held low.
        pub fn with_hold_ms(mut self, hold_ms: u32) -> Self {
            self.hold_ms = hold_ms;
            self
        }
    }

    impl<P: OutputPin, D: DelayNs> ResetLine for GpioReset<P, D> {
        fn pulse(&mut self) -> Result<()> {
            self.pin
                .set_low()
                .map_err(|e| Error::Pin(format!("{:?}", e)))?;
            self.delay.delay_ms(self.hold_ms);
            self.pin
                .set_high()
                .map_err(|e| Error::Pin(format!("{:?}", e)))
        }
    }
}
