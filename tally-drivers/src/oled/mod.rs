//! OLED display driver implementations

pub mod glyphs;
pub mod ssd1306;

pub use glyphs::{split_digits, FontRom, GlyphRef, GLYPH_BYTES, GLYPH_ROM};
pub use ssd1306::{OledConfig, PanelGeometry, PowerSource, Ssd1306};
