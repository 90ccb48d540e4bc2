// Raspberry Pi Pico wiring used by the demos.
use rp2040_hal::{
    gpio::{
        bank0::{Gpio15, Gpio25},
        FunctionSioInput, FunctionSioOutput, Pin, PullDown, PullUp,
    },
    pac::Interrupt,
    timer::Alarm0,
};

macro_rules! define_pins {
    ($($alias:ident, $pin:tt),*) => {
        $(
            #[macro_export]
            macro_rules! $alias {
                ($pins:expr) => {
                    $pins.$pin
                };
            }
        )*
    };
}

define_pins! {
    onboard_led, gpio25,
    user_button, gpio15
}

pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;
pub type ButtonPin = Pin<Gpio15, FunctionSioInput, PullUp>;
pub type TickAlarm = Alarm0;

pub fn button_irq() -> Interrupt {
    Interrupt::IO_IRQ_BANK0
}

pub fn tick_irq() -> Interrupt {
    Interrupt::TIMER_IRQ_0
}
