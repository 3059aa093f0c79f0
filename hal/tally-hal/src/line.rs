//! Open-drain bus line abstraction
//!
//! Provides a trait for a single shared bus line that is either actively
//! driven low or released to float, as wired-AND buses like I2C require.

/// Open-drain bus line
///
/// Implementations emulate open-drain behavior on push-pull hardware:
/// `set_low` sinks the line, `release` switches the pin to a
/// high-impedance input so the external pull-up raises it. A conforming
/// implementation never drives the line high.
pub trait BusLine {
    /// Actively drive the line low (logic 0)
    fn set_low(&mut self);

    /// Release the line to high impedance
    ///
    /// The pull-up takes the line high unless another device on the bus
    /// holds it low.
    fn release(&mut self);

    /// Sample the line level (true = high)
    fn is_high(&mut self) -> bool;

    /// Sample the line level (true = low)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
