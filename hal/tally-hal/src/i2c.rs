//! I2C bus abstractions
//!
//! Provides the master-side primitive operations a byte-oriented write-only
//! device driver needs: start condition, byte write, stop condition.
//! Implementations may be hardware peripherals or bit-banged GPIO.

/// I2C bus master primitives
///
/// Transfers are composed by the caller: `start`, one `write_byte` per
/// byte (address byte included), `stop`. Implementations are blocking;
/// a started transfer must be finished before the bus is reused.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Generate a start condition and claim the bus
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Clock out one byte MSB-first and sample the slave's ACK
    ///
    /// How a NACK is reported depends on the implementation's
    /// [`AckPolicy`].
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Generate a stop condition and release the bus
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// What to do with the acknowledge bit sampled after each byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckPolicy {
    /// A missing ACK fails the byte write with an error
    Require,
    /// The ACK bit is sampled but discarded (fire-and-forget)
    Ignore,
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// ACK handling for byte writes
    pub ack_policy: AckPolicy,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
            ack_policy: AckPolicy::Require,
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        ack_policy: AckPolicy::Require,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        ack_policy: AckPolicy::Require,
    };

    /// Replace the ACK policy, keeping the clock rate
    pub const fn with_ack_policy(self, ack_policy: AckPolicy) -> Self {
        Self { ack_policy, ..self }
    }
}
