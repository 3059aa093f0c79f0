//! Software I2C master
//!
//! Bit-bangs the I2C write path over two open-drain GPIO lines. This is
//! the bus for boards where the hardware I2C peripheral is unavailable
//! or its pins are already taken - any two GPIOs will do, as long as the
//! board has pull-up resistors on them.
//!
//! Only the master-transmit direction is implemented: start, address,
//! data bytes, stop. That is all a write-only peripheral like an SSD1306
//! needs.

use embedded_hal::delay::DelayNs;
use tally_hal::{AckPolicy, BusLine, I2cBus, I2cConfig};

/// Software I2C bus error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The addressed device did not acknowledge a byte
    Nack,
}

/// Bit-banged I2C master over two [`BusLine`]s
///
/// The lines are never driven high: a `1` is produced by releasing the
/// line and letting the external pull-up raise it, so a slave can always
/// hold the bus low (clock stretching is not supported, but the wiring
/// is honest open-drain).
///
/// Timing is symmetric: every line transition is followed by a settle
/// delay of a quarter SCL period, giving roughly the configured clock
/// frequency with a 50% duty cycle. All operations block until the line
/// edges have gone out; nothing here is async or interrupt-driven, and
/// a started transfer must be completed before the bus is reused.
pub struct SoftI2c<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    config: I2cConfig,
    /// Quarter of the SCL period, in nanoseconds
    settle_ns: u32,
}

impl<SCL, SDA, D> SoftI2c<SCL, SDA, D>
where
    SCL: BusLine,
    SDA: BusLine,
    D: DelayNs,
{
    /// Create a bus from two lines and a delay provider
    ///
    /// Both lines are released so the bus idles high.
    pub fn new(scl: SCL, sda: SDA, delay: D, config: I2cConfig) -> Self {
        let settle_ns = 1_000_000_000 / config.frequency.max(1) / 4;
        let mut bus = Self {
            scl,
            sda,
            delay,
            config,
            settle_ns,
        };
        bus.scl.release();
        bus.sda.release();
        bus.settle();
        bus
    }

    /// Active configuration
    pub fn config(&self) -> I2cConfig {
        self.config
    }

    /// Destroy the bus, returning the lines and the delay provider
    pub fn free(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_ns(self.settle_ns);
    }

    /// Put one bit on SDA while SCL is low, then clock it out
    fn write_bit(&mut self, high: bool) {
        if high {
            self.sda.release();
        } else {
            self.sda.set_low();
        }
        self.settle();
        self.scl.release();
        self.settle();
        self.scl.set_low();
        self.settle();
    }

    /// Ninth clock pulse: release SDA and sample the slave's acknowledge
    ///
    /// Returns true when the slave held the line low during the pulse.
    fn clock_ack(&mut self) -> bool {
        self.sda.release();
        self.settle();
        self.scl.release();
        self.settle();
        let acked = self.sda.is_low();
        self.scl.set_low();
        self.settle();
        acked
    }
}

impl<SCL, SDA, D> I2cBus for SoftI2c<SCL, SDA, D>
where
    SCL: BusLine,
    SDA: BusLine,
    D: DelayNs,
{
    type Error = BusError;

    /// Start condition: SDA falls while SCL is high, then SCL falls
    ///
    /// Begins by releasing both lines, so a transfer abandoned after a
    /// NACK cannot wedge the next one.
    fn start(&mut self) -> Result<(), BusError> {
        self.sda.release();
        self.scl.release();
        self.settle();
        self.sda.set_low();
        self.settle();
        self.scl.set_low();
        self.settle();
        Ok(())
    }

    /// Clock out one byte MSB-first, then sample the acknowledge bit
    ///
    /// SDA only changes while SCL is low and is held stable for the full
    /// high phase of each clock pulse. A missing ACK is an error under
    /// [`AckPolicy::Require`] and silently dropped under
    /// [`AckPolicy::Ignore`]; the byte has been clocked out either way.
    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        for bit in (0..8).rev() {
            self.write_bit(byte & (1 << bit) != 0);
        }
        let acked = self.clock_ack();
        match self.config.ack_policy {
            AckPolicy::Require if !acked => Err(BusError::Nack),
            _ => Ok(()),
        }
    }

    /// Stop condition: SDA rises while SCL is high
    ///
    /// Leaves both lines released, the idle state.
    fn stop(&mut self) -> Result<(), BusError> {
        self.sda.set_low();
        self.settle();
        self.scl.release();
        self.settle();
        self.sda.release();
        self.settle();
        Ok(())
    }
}
