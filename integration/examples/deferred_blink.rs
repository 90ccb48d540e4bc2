// The onboard LED blinks from a timer alarm interrupt. Finished blink runs
// and button presses are handed to the main loop through a heap-backed
// queue, which drains at most a few callbacks per iteration.
#![no_std]
#![no_main]
extern crate alloc;

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{debug, error, info, warn};
use defmt_rtt as _;
use fugit::RateExtU32;
use panic_probe as _;
use rp2040_hal::gpio::Interrupt::EdgeLow;
use rp2040_hal::timer::Alarm;
use rp2040_hal::{
    clocks::init_clocks_and_plls,
    entry, pac,
    pac::{interrupt, NVIC},
    sio::Sio,
    watchdog::Watchdog,
    Timer,
};
use rp_pico::XOSC_CRYSTAL_FREQ;

use integration::board::{button_irq, tick_irq, ButtonPin, LedPin, TickAlarm};
use integration::global_allocator::{free_bytes, init_allocator};
use integration::{onboard_led, user_button};
use isrkit::led::{BlinkMode, Led};
use isrkit::{Callback, HeapDeferQueue};

const DRAIN_PER_ITERATION: usize = 4;
const BLINKS_PER_RUN: u32 = 3;

static DEFERRED: HeapDeferQueue = HeapDeferQueue::with_limit(64);

static LED: Mutex<RefCell<Option<(Led<LedPin>, TickAlarm)>>> = Mutex::new(RefCell::new(None));
static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    init_allocator();
    let mut pac = pac::Peripherals::take().unwrap();
    let sio = Sio::new(pac.SIO);
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();
    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let pins =
        rp2040_hal::gpio::Pins::new(pac.IO_BANK0, pac.PADS_BANK0, sio.gpio_bank0, &mut pac.RESETS);
    let led_pin: LedPin = onboard_led!(pins).reconfigure();
    let mut button: ButtonPin = user_button!(pins).reconfigure();
    button.set_interrupt_enabled(EdgeLow, true);

    let mut led = Led::new(led_pin);
    led.blink(BLINKS_PER_RUN, 2.Hz()).unwrap();
    let mut alarm = timer.alarm_0().unwrap();
    alarm.schedule(led.tick_interval()).unwrap();
    alarm.enable_interrupt();

    critical_section::with(|cs| {
        *LED.borrow(cs).borrow_mut() = Some((led, alarm));
        *BUTTON.borrow(cs).borrow_mut() = Some(button);
    });

    unsafe {
        NVIC::unmask(tick_irq());
        NVIC::unmask(button_irq());
    }

    info!("Program start, heap free = {}", free_bytes());
    loop {
        let executed = DEFERRED.drain_up_to(DRAIN_PER_ITERATION);
        if executed > 0 {
            debug!("ran {} deferred, {} still pending", executed, DEFERRED.pending_count());
        }
        cortex_m::asm::wfi();
    }
}

fn restart_blinking() {
    reschedule_led(|led| led.blink(BLINKS_PER_RUN, 2.Hz()));
}

fn toggle_blinking() {
    reschedule_led(|led| led.toggle_blinking());
}

fn reschedule_led<F>(f: F)
where
    F: FnOnce(&mut Led<LedPin>) -> Result<(), core::convert::Infallible>,
{
    critical_section::with(|cs| {
        if let Some((led, alarm)) = LED.borrow(cs).borrow_mut().as_mut() {
            let _ = f(led);
            if led.is_blinking() && alarm.schedule(led.tick_interval()).is_err() {
                error!("failed to schedule the blink alarm");
            }
        }
    });
}

fn defer(callback: Callback) {
    if let Err(err) = DEFERRED.submit(callback) {
        warn!("dropping deferred work: {}, dropped = {}", err, DEFERRED.dropped_count());
    }
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some((led, alarm)) = LED.borrow(cs).borrow_mut().as_mut() {
            alarm.clear_interrupt();
            let counted = matches!(led.mode(), BlinkMode::Counted(_));
            match led.tick() {
                Ok(true) => {
                    if alarm.schedule(led.tick_interval()).is_err() {
                        error!("failed to schedule the blink alarm");
                    }
                }
                Ok(false) if counted => {
                    let finished_at = led.blink_frequency().to_Hz();
                    defer(Callback::boxed(move || {
                        info!("blink run at {} Hz finished", finished_at);
                        restart_blinking();
                    }));
                }
                Ok(false) => {}
                Err(_) => defer(Callback::from_fn(|| error!("led pin write failed"))),
            }
        }
    });
}

#[interrupt]
fn IO_IRQ_BANK0() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON.borrow(cs).borrow_mut().as_mut() {
            button.clear_interrupt(EdgeLow);
        }
    });
    defer(Callback::from_fn(|| {
        info!("button pressed, toggling blinking");
        toggle_blinking();
    }));
}
