//! Glyph table and glyph run references
//!
//! The 5x7 glyphs the display driver knows how to draw, laid out exactly
//! as they sit in the device byte store: ten digits and a decimal point
//! first, then the fixed "ADC value:" label, with 0xFF filler in the
//! gaps. Each glyph is five column bytes, least significant bit at the
//! top row; the sixth cell column is the inter-character gap and is never
//! stored.

use tally_hal::ByteRom;

/// Column bytes per stored glyph
pub const GLYPH_BYTES: u8 = 5;

/// The device glyph store image
///
/// On parts with a spare EEPROM or flash data page this table can live
/// there instead; [`FontRom`] serves it straight from program memory.
pub const GLYPH_ROM: [u8; 112] = [
    // Digits and decimal point (offsets 0-54)
    0x3E, 0x51, 0x49, 0x45, 0x3E, // '0'
    0x00, 0x42, 0x7F, 0x40, 0x00, // '1'
    0x72, 0x49, 0x49, 0x49, 0x46, // '2'
    0x21, 0x41, 0x49, 0x4D, 0x33, // '3'
    0x18, 0x14, 0x12, 0x7F, 0x10, // '4'
    0x27, 0x45, 0x45, 0x45, 0x39, // '5'
    0x3C, 0x4A, 0x49, 0x49, 0x31, // '6'
    0x41, 0x21, 0x11, 0x09, 0x07, // '7'
    0x36, 0x49, 0x49, 0x49, 0x36, // '8'
    0x46, 0x49, 0x49, 0x29, 0x1E, // '9'
    0x00, 0x00, 0x60, 0x60, 0x00, // '.'
    0xFF, // filler (offset 55)
    // "ADC value:" label (offsets 56-105)
    0x7C, 0x12, 0x11, 0x12, 0x7C, // 'A'
    0x7F, 0x41, 0x41, 0x41, 0x3E, // 'D'
    0x3E, 0x41, 0x41, 0x41, 0x22, // 'C'
    0x00, 0x00, 0x00, 0x00, 0x00, // ' '
    0x1C, 0x20, 0x40, 0x20, 0x1C, // 'v'
    0x20, 0x54, 0x54, 0x78, 0x40, // 'a'
    0x00, 0x41, 0x7F, 0x40, 0x00, // 'l'
    0x3C, 0x40, 0x40, 0x20, 0x7C, // 'u'
    0x38, 0x54, 0x54, 0x54, 0x18, // 'e'
    0x00, 0x00, 0x14, 0x00, 0x00, // ':'
    // Filler (offsets 106-111)
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Glyph store backed by [`GLYPH_ROM`] in program memory
#[derive(Debug, Clone, Copy, Default)]
pub struct FontRom;

impl ByteRom for FontRom {
    /// Read one table byte
    ///
    /// Reads past the table return 0xFF, like erased EEPROM cells.
    fn read_byte(&self, index: u8) -> u8 {
        GLYPH_ROM.get(usize::from(index)).copied().unwrap_or(0xFF)
    }

    fn len(&self) -> usize {
        GLYPH_ROM.len()
    }
}

/// Reference to a run of consecutive glyphs in a byte store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphRef {
    /// Byte offset of the first glyph image
    pub offset: u8,
    /// Number of glyphs in the run
    pub count: u8,
}

impl GlyphRef {
    /// The "ADC value:" label
    pub const LABEL: Self = Self {
        offset: 56,
        count: 10,
    };

    /// The decimal point
    pub const DOT: Self = Self {
        offset: 50,
        count: 1,
    };

    /// A single decimal digit
    ///
    /// Meaningful for values 0 to 9; larger values index past the digit
    /// table with the same wrapping arithmetic the store uses.
    pub const fn digit(value: u8) -> Self {
        Self {
            offset: value.wrapping_mul(GLYPH_BYTES),
            count: 1,
        }
    }
}

/// Decompose a value into its four decimal display digits
/// (thousands, hundreds, tens, ones)
///
/// Values above 9999 spill into the thousands digit unreduced; callers
/// wanting a strict four-digit readout clamp first.
pub const fn split_digits(value: u16) -> [u8; 4] {
    [
        (value / 1000) as u8,
        (value % 1000 / 100) as u8,
        (value % 100 / 10) as u8,
        (value % 10) as u8,
    ]
}
