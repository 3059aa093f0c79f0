//! GPIO pin implementations
//!
//! The RP2040 pads are push-pull, so open-drain lines are emulated by
//! flipping the pad direction: output drives the latched low level,
//! input lets the pull-up win.

use embassy_rp::gpio::{Flex, Pull};
use tally_hal::BusLine;

/// Open-drain bus line over a [`Flex`] pad
///
/// The output latch is loaded with low once at construction and never
/// touched again; [`BusLine::set_low`] and [`BusLine::release`] only
/// change the pad direction. The internal pull-up is enabled as a
/// fallback, though a real bus still wants external resistors - the
/// on-chip ones are in the 50k range and make for slow rising edges.
pub struct OpenDrainFlex<'d> {
    pin: Flex<'d>,
}

impl<'d> OpenDrainFlex<'d> {
    /// Wrap a pad, leaving the line released
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::Up);
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }

    /// Unwrap the pad
    pub fn free(self) -> Flex<'d> {
        self.pin
    }
}

impl BusLine for OpenDrainFlex<'_> {
    fn set_low(&mut self) {
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
