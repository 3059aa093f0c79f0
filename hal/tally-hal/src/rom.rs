//! Read-only byte store abstractions
//!
//! Small predefined data tables (glyph bitmaps, calibration blobs) often
//! live outside normal program memory: on-chip EEPROM, a flash data page,
//! or a plain const array linked into the binary. This trait lets drivers
//! fetch such bytes without caring where they live.

/// Byte-addressable read-only store
///
/// Reads are infallible: the store is predefined data, and every index in
/// `0..len()` yields a byte. Out-of-range behavior is implementation
/// defined (a const-array store will panic in debug builds, real EEPROM
/// wraps or returns erased 0xFF).
pub trait ByteRom {
    /// Read the byte at `index`
    fn read_byte(&self, index: u8) -> u8;

    /// Number of addressable bytes
    fn len(&self) -> usize;

    /// True if the store holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
