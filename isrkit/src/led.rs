use embedded_hal::digital::OutputPin;
use fugit::{HertzU32, MicrosDurationU32};

use crate::consts::DEFAULT_BLINK_FREQ;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum LedState {
    On,
    Off,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    Steady,
    Continuous,
    /// Blinks left before the LED turns itself off. One blink is one
    /// on-to-off transition.
    Counted(u32),
}

/// An LED on a single output pin, with a blink state advanced by
/// [`Led::tick`].
///
/// The LED does not own a timer. Whoever drives it calls `tick()` from a
/// periodic interrupt every [`Led::tick_interval`], which is half of the
/// blink period.
pub struct Led<P: OutputPin> {
    pin: P,
    state: LedState,
    mode: BlinkMode,
    freq: HertzU32,
}

impl<P: OutputPin> Led<P> {
    /// Takes a pin that is currently low.
    pub fn new(pin: P) -> Self {
        Led { pin, state: LedState::Off, mode: BlinkMode::Steady, freq: DEFAULT_BLINK_FREQ }
    }

    pub fn on(&mut self) -> Result<(), P::Error> {
        self.state = LedState::On;
        self.flush()
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.state = LedState::Off;
        self.flush()
    }

    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.state = match self.state {
            LedState::Off => LedState::On,
            LedState::On => LedState::Off,
        };
        self.flush()
    }

    fn flush(&mut self) -> Result<(), P::Error> {
        match self.state {
            LedState::Off => self.pin.set_low(),
            LedState::On => self.pin.set_high(),
        }
    }

    pub fn is_on(&self) -> bool {
        self.state == LedState::On
    }

    /// Blinks `n` times at `freq`, starting from off, then stops with the
    /// LED off.
    pub fn blink(&mut self, n: u32, freq: HertzU32) -> Result<(), P::Error> {
        self.freq = freq;
        self.off()?;
        self.mode = BlinkMode::Counted(n);
        Ok(())
    }

    pub fn start_blinking(&mut self, freq: HertzU32) -> Result<(), P::Error> {
        self.set_blinking(true, freq)
    }

    pub fn stop_blinking(&mut self) -> Result<(), P::Error> {
        self.set_blinking(false, self.freq)
    }

    /// `freq` is ignored when `blinking` is false. Stopping leaves the LED off.
    pub fn set_blinking(&mut self, blinking: bool, freq: HertzU32) -> Result<(), P::Error> {
        if blinking {
            self.freq = freq;
            self.mode = BlinkMode::Continuous;
            Ok(())
        } else {
            self.mode = BlinkMode::Steady;
            self.off()
        }
    }

    pub fn toggle_blinking(&mut self) -> Result<(), P::Error> {
        self.set_blinking(!self.is_blinking(), self.freq)
    }

    pub fn is_blinking(&self) -> bool {
        self.mode != BlinkMode::Steady
    }

    pub fn mode(&self) -> BlinkMode {
        self.mode
    }

    pub fn blink_frequency(&self) -> HertzU32 {
        self.freq
    }

    /// Time between two ticks at the current blink frequency. A zero
    /// frequency counts as 1 Hz.
    pub fn tick_interval(&self) -> MicrosDurationU32 {
        let hz = self.freq.to_Hz().max(1);
        MicrosDurationU32::from_ticks(500_000 / hz)
    }

    /// Advances the blink state by half a period. Returns whether the LED is
    /// still blinking afterwards, so the caller can stop its timer.
    pub fn tick(&mut self) -> Result<bool, P::Error> {
        match self.mode {
            BlinkMode::Steady => Ok(false),
            BlinkMode::Continuous => {
                self.toggle()?;
                Ok(true)
            }
            BlinkMode::Counted(0) => {
                self.mode = BlinkMode::Steady;
                self.off()?;
                Ok(false)
            }
            BlinkMode::Counted(remaining) => {
                if self.is_on() {
                    self.mode = BlinkMode::Counted(remaining - 1);
                }
                self.toggle()?;
                Ok(true)
            }
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital::ErrorType;
    use fugit::RateExtU32;

    use super::*;

    #[derive(Default)]
    struct MockPin {
        high: bool,
        writes: Vec<bool>,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes.push(true);
            Ok(())
        }
    }

    #[test]
    fn test_on_off_toggle() {
        let mut led = Led::new(MockPin::default());
        assert!(!led.is_on());
        led.on().unwrap();
        assert!(led.pin.high);
        led.toggle().unwrap();
        assert!(!led.pin.high);
        assert!(!led.is_on());
        led.toggle().unwrap();
        led.off().unwrap();
        assert_eq!(led.release().writes, vec![true, false, true, false]);
    }

    #[test]
    fn test_continuous_blinking() {
        let mut led = Led::new(MockPin::default());
        assert_eq!(led.tick(), Ok(false));

        led.start_blinking(2.Hz()).unwrap();
        assert!(led.is_blinking());
        assert_eq!(led.tick_interval(), MicrosDurationU32::from_ticks(250_000));
        for _ in 0..4 {
            assert_eq!(led.tick(), Ok(true));
        }
        assert_eq!(led.pin.writes, vec![true, false, true, false]);

        led.toggle_blinking().unwrap();
        assert!(!led.is_blinking());
        assert!(!led.pin.high);
        assert_eq!(led.tick(), Ok(false));

        led.toggle_blinking().unwrap();
        assert_eq!(led.blink_frequency(), 2.Hz::<1, 1>());
        assert!(led.is_blinking());
    }

    #[test]
    fn test_counted_blink_stops_off() {
        let mut led = Led::new(MockPin::default());
        led.blink(2, 1.Hz()).unwrap();
        assert!(!led.pin.high);
        assert_eq!(led.mode(), BlinkMode::Counted(2));

        let mut ticks = 0;
        while led.tick().unwrap() {
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(ticks, 4);
        assert!(!led.is_blinking());
        assert!(!led.pin.high);

        let on_to_off = led.pin.writes.windows(2).filter(|w| w[0] && !w[1]).count();
        assert_eq!(on_to_off, 2);
    }

    #[test]
    fn test_zero_frequency_uses_one_hz() {
        let mut led = Led::new(MockPin::default());
        led.start_blinking(0.Hz()).unwrap();
        assert_eq!(led.tick_interval(), MicrosDurationU32::from_ticks(500_000));
    }
}
