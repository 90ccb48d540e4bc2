// Button presses are reported from the main loop instead of the GPIO
// interrupt, using the global queue and its shortcut macros.
#![no_std]
#![no_main]

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use critical_section::Mutex;
use defmt::{info, warn};
use defmt_rtt as _;
use panic_probe as _;
use rp2040_hal::gpio::Interrupt::EdgeLow;
use rp2040_hal::{
    clocks::init_clocks_and_plls,
    entry, pac,
    pac::{interrupt, NVIC},
    sio::Sio,
    watchdog::Watchdog,
};
use rp_pico::XOSC_CRYSTAL_FREQ;

use integration::board::{button_irq, ButtonPin};
use integration::user_button;
use isrkit::{run_all, run_later, run_n, run_one, Callback};

static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));
static PRESSES: AtomicUsize = AtomicUsize::new(0);

#[entry]
fn main() -> ! {
    info!("Program start");
    let mut pac = pac::Peripherals::take().unwrap();
    let sio = Sio::new(pac.SIO);
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let _clocks = init_clocks_and_plls(
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

    let pins =
        rp2040_hal::gpio::Pins::new(pac.IO_BANK0, pac.PADS_BANK0, sio.gpio_bank0, &mut pac.RESETS);
    let mut button: ButtonPin = user_button!(pins).reconfigure();
    button.set_interrupt_enabled(EdgeLow, true);
    critical_section::with(|cs| *BUTTON.borrow(cs).borrow_mut() = Some(button));

    unsafe {
        NVIC::unmask(button_irq());
    }

    loop {
        // ... other main loop work ...

        // everything scheduled by interrupts so far
        run_all!();

        // or bound the work done per iteration
        run_n!(2);
        run_one!();

        cortex_m::asm::wfi();
    }
}

fn report_press() {
    info!("button pressed, printed from the main loop");
}

fn report_count(count: usize) {
    info!("{} presses so far", count);
}

#[interrupt]
fn IO_IRQ_BANK0() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON.borrow(cs).borrow_mut().as_mut() {
            button.clear_interrupt(EdgeLow);
        }
    });

    // only this handler writes the counter
    let count = PRESSES.load(Ordering::Relaxed) + 1;
    PRESSES.store(count, Ordering::Relaxed);

    if run_later!(report_press).is_err()
        || isrkit::global::queue().submit(Callback::with_context(report_count, count)).is_err()
    {
        warn!("deferred queue full, dropped = {}", isrkit::global::queue().dropped_count());
    }
}
