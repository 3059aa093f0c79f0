//! Tally - pocket event-counter firmware
//!
//! Main firmware binary for RP2040-based boards. Drives an SSD1306 OLED
//! over a bit-banged two-wire bus and shows a label plus a counter that
//! ticks once per second.
//!
//! The bus is software-driven so any two GPIOs work; the defaults below
//! match the Pico's I2C0 pins, making the wiring interchangeable with a
//! hardware-bus setup.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::Flex;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use tally_drivers::bus::SoftI2c;
use tally_drivers::oled::{split_digits, FontRom, GlyphRef, OledConfig, Ssd1306};
use tally_hal::{AckPolicy, I2cConfig};
use tally_hal_rp2040::OpenDrainFlex;

/// Counter tick period
const TICK_MS: u64 = 1000;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Tally firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());

    // Bus lines on GP4 (SDA) and GP5 (SCL); external pull-ups expected
    let sda = OpenDrainFlex::new(Flex::new(p.PIN_4));
    let scl = OpenDrainFlex::new(Flex::new(p.PIN_5));

    // The display is best-effort: NACKs are sampled and dropped rather
    // than failing a frame mid-draw
    let config = I2cConfig::STANDARD.with_ack_policy(AckPolicy::Ignore);
    let bus = SoftI2c::new(scl, sda, Delay, config);

    // Give the module's charge pump rails time to settle after power-up
    Timer::after_millis(10).await;

    let display = Ssd1306::new(bus, FontRom, OledConfig::default());
    let mut display = match display.init() {
        Ok(display) => display,
        Err(e) => {
            error!("Failed to initialize display: {:?}", e);
            // Nothing to show the failure on; park here so the probe
            // log is the last word
            loop {
                Timer::after_secs(60).await;
            }
        }
    };
    info!("OLED initialized");

    display.clear().ok();
    display.set_position(1, 1);
    display.draw_glyphs(None, GlyphRef::LABEL).ok();

    let mut count: u16 = 0;
    loop {
        display.set_position(1, 2);
        for digit in split_digits(count) {
            display.draw_glyphs(None, GlyphRef::digit(digit)).ok();
        }
        trace!("Displayed count {}", count);

        // Four digit cells on screen, so roll over at 9999
        count = (count + 1) % 10_000;
        Timer::after_millis(TICK_MS).await;
    }
}
