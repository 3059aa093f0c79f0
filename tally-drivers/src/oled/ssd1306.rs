//! SSD1306 OLED display driver
//!
//! Driver for SSD1306-based monochrome OLEDs on the bit-banged I2C bus.
//! Text-only: glyphs are five columns wide in a 6x8 pixel cell and go
//! straight to display RAM, so no frame buffer is kept on the MCU side.
//! Supports the 128x32, 128x64 and 96x16 panel shapes.

use tally_hal::{ByteRom, I2cBus};

use crate::oled::glyphs::{GlyphRef, GLYPH_BYTES};

/// Control bytes prefixing every transfer (Co bit clear)
mod ctrl {
    /// Remaining bytes are commands
    pub const COMMAND: u8 = 0x00;
    /// Remaining bytes are display RAM data
    pub const DATA: u8 = 0x40;
}

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const ACTIVATE_SCROLL: u8 = 0x2F;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
}

/// Supported panel shapes
///
/// The shape drives the multiplex ratio, the COM pin wiring and the
/// vendor contrast recommendation during init, and the window bounds of
/// [`Ssd1306::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelGeometry {
    /// 128x32, the common 0.91" bar
    W128xH32,
    /// 128x64, the common 0.96" module
    W128xH64,
    /// 96x16 strip
    W96xH16,
}

impl PanelGeometry {
    /// Panel width in pixels
    pub const fn width(self) -> u8 {
        match self {
            Self::W128xH32 | Self::W128xH64 => 128,
            Self::W96xH16 => 96,
        }
    }

    /// Panel height in pixels
    pub const fn height(self) -> u8 {
        match self {
            Self::W128xH32 => 32,
            Self::W128xH64 => 64,
            Self::W96xH16 => 16,
        }
    }

    /// Number of 8-pixel-tall RAM pages
    pub const fn pages(self) -> u8 {
        self.height() / 8
    }

    /// Whole display RAM size in bytes
    pub const fn frame_bytes(self) -> u16 {
        self.width() as u16 * self.height() as u16 / 8
    }

    /// COM pin hardware configuration (argument to 0xDA)
    const fn com_pins(self) -> u8 {
        match self {
            Self::W128xH64 => 0x12,
            Self::W128xH32 | Self::W96xH16 => 0x02,
        }
    }

    /// Vendor-recommended contrast (argument to 0x81)
    const fn contrast(self, power: PowerSource) -> u8 {
        match (self, power) {
            (Self::W128xH32, _) => 0xFF,
            (Self::W128xH64, PowerSource::External) => 0x9F,
            (Self::W128xH64, PowerSource::Internal) => 0xCF,
            (Self::W96xH16, PowerSource::External) => 0x10,
            (Self::W96xH16, PowerSource::Internal) => 0xAF,
        }
    }
}

/// Where the panel drive voltage comes from
///
/// Most hobby modules have no separate panel supply and rely on the
/// controller's internal charge pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSource {
    /// On-chip charge pump generates the panel voltage
    Internal,
    /// Panel voltage supplied externally
    External,
}

impl PowerSource {
    /// Charge pump setting (argument to 0x8D)
    const fn charge_pump(self) -> u8 {
        match self {
            Self::Internal => 0x14,
            Self::External => 0x10,
        }
    }

    /// Pre-charge period (argument to 0xD9)
    const fn precharge(self) -> u8 {
        match self {
            Self::Internal => 0xF1,
            Self::External => 0x22,
        }
    }
}

/// Display driver configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OledConfig {
    /// 7-bit I2C address (0x3C on most modules, 0x3D with the address
    /// strap moved)
    pub address: u8,
    /// Panel shape
    pub geometry: PanelGeometry,
    /// Panel supply arrangement
    pub power: PowerSource,
}

impl Default for OledConfig {
    fn default() -> Self {
        Self {
            address: 0x3C,
            geometry: PanelGeometry::W128xH32,
            power: PowerSource::Internal,
        }
    }
}

/// SSD1306 display session
///
/// Owns the bus and the glyph store for its lifetime. Created cold with
/// [`new`](Self::new), brought up by [`init`](Self::init); all drawing
/// then goes through the 1-based character cursor, which addresses 6x8
/// pixel cells left to right, top to bottom.
pub struct Ssd1306<B, R> {
    bus: B,
    rom: R,
    /// Wire address byte: 7-bit address shifted left, write bit clear
    address: u8,
    geometry: PanelGeometry,
    power: PowerSource,
    column: u8,
    row: u8,
}

impl<B, R> Ssd1306<B, R>
where
    B: I2cBus,
    R: ByteRom,
{
    /// Create a cold session
    ///
    /// No bus traffic happens here; call [`init`](Self::init) to bring
    /// the panel up. The cursor starts at (1, 1).
    pub fn new(bus: B, rom: R, config: OledConfig) -> Self {
        Self {
            bus,
            rom,
            address: config.address << 1,
            geometry: config.geometry,
            power: config.power,
            column: 1,
            row: 1,
        }
    }

    /// Run the power-on sequence and hand back the ready session
    ///
    /// Consumes the session, so the sequence runs at most once and no
    /// drawing can precede it. The command stream is fixed for a given
    /// (geometry, power) pair; each command goes out in its own
    /// transfer, which the controller accepts at any bus speed.
    pub fn init(mut self) -> Result<Self, B::Error> {
        let sequence: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Recommended ratio
            cmd::SET_MULTIPLEX,
            self.geometry.height() - 1,
            cmd::SET_DISPLAY_OFFSET,
            0x00, // No offset
            cmd::SET_START_LINE | 0x00,
            cmd::CHARGE_PUMP,
            self.power.charge_pump(),
            cmd::MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            self.geometry.com_pins(),
            cmd::SET_CONTRAST,
            self.geometry.contrast(self.power),
            cmd::SET_PRECHARGE,
            self.power.precharge(),
            cmd::SET_VCOM_DETECT,
            0x20, // Deselect level
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DEACTIVATE_SCROLL,
            cmd::DISPLAY_ON,
        ];
        for &byte in sequence {
            self.command(byte)?;
        }
        Ok(self)
    }

    /// Send one command byte in its own control-prefixed transfer
    pub fn command(&mut self, byte: u8) -> Result<(), B::Error> {
        self.bus.start()?;
        self.bus.write_byte(self.address)?;
        self.bus.write_byte(ctrl::COMMAND)?;
        self.bus.write_byte(byte)?;
        self.bus.stop()
    }

    /// Move the character cursor (1-based column and row)
    ///
    /// Pure bookkeeping; the display window is set when something is
    /// drawn. Out-of-panel positions are not rejected: the cell
    /// arithmetic wraps at 256 and the controller clips, the same as
    /// issuing the raw addressing commands would.
    pub fn set_position(&mut self, column: u8, row: u8) {
        self.column = column;
        self.row = row;
    }

    /// Current character cursor (column, row)
    pub fn position(&self) -> (u8, u8) {
        (self.column, self.row)
    }

    /// Draw a run of glyphs at the cursor, advancing one cell per glyph
    ///
    /// The five column bytes of each glyph come from `buf` when given,
    /// otherwise from the session's glyph store; `run.offset` indexes
    /// into whichever source is active, so the same reference works
    /// against both. Each glyph gets its own column and page window,
    /// keeping the controller from running ahead into the gap column.
    ///
    /// # Panics
    ///
    /// If `buf` is `Some` and does not cover the run.
    pub fn draw_glyphs(&mut self, buf: Option<&[u8]>, run: GlyphRef) -> Result<(), B::Error> {
        for glyph in 0..run.count {
            self.char_window()?;

            self.bus.start()?;
            self.bus.write_byte(self.address)?;
            self.bus.write_byte(ctrl::DATA)?;
            let base = run.offset.wrapping_add(glyph.wrapping_mul(GLYPH_BYTES));
            for i in 0..GLYPH_BYTES {
                let index = base.wrapping_add(i);
                let byte = match buf {
                    Some(bytes) => bytes[usize::from(index)],
                    None => self.rom.read_byte(index),
                };
                self.bus.write_byte(byte)?;
            }
            self.bus.stop()?;

            self.column = self.column.wrapping_add(1);
        }
        Ok(())
    }

    /// Blank the whole panel in one streamed transfer
    ///
    /// Opens a full-panel window and writes one zero byte per display
    /// RAM cell, without buffering a frame on this side. The cursor
    /// keeps its position.
    pub fn clear(&mut self) -> Result<(), B::Error> {
        self.command(cmd::COLUMN_ADDR)?;
        self.command(0)?;
        self.command(self.geometry.width() - 1)?;

        self.command(cmd::PAGE_ADDR)?;
        self.command(0)?;
        self.command(self.geometry.pages() - 1)?;

        self.bus.start()?;
        self.bus.write_byte(self.address)?;
        self.bus.write_byte(ctrl::DATA)?;
        for _ in 0..self.geometry.frame_bytes() {
            self.bus.write_byte(0x00)?;
        }
        self.bus.stop()
    }

    /// Destroy the session, returning the bus and the glyph store
    pub fn free(self) -> (B, R) {
        (self.bus, self.rom)
    }

    /// Address one 6x8 character cell at the cursor
    ///
    /// The sixth cell column stays outside the window; it is the
    /// inter-character gap and is never written.
    fn char_window(&mut self) -> Result<(), B::Error> {
        let col = self.column.wrapping_sub(1).wrapping_mul(6);
        self.command(cmd::COLUMN_ADDR)?;
        self.command(col)?;
        self.command(col.wrapping_add(4))?;

        let page = self.row.wrapping_sub(1);
        self.command(cmd::PAGE_ADDR)?;
        self.command(page)?;
        self.command(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusError;
    use crate::oled::glyphs::{split_digits, FontRom, GLYPH_ROM};
    use core::convert::Infallible;
    use heapless::Vec;

    /// Wire address byte for the default 0x3C module
    const ADDR: u8 = 0x3C << 1;

    /// One recorded bus primitive
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum BusEvent {
        Start,
        Byte(u8),
        Stop,
    }

    /// Mock bus capturing every primitive call
    #[derive(Default)]
    struct TraceBus {
        events: Vec<BusEvent, 4096>,
    }

    impl I2cBus for TraceBus {
        type Error = Infallible;

        fn start(&mut self) -> Result<(), Infallible> {
            self.events.push(BusEvent::Start).unwrap();
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), Infallible> {
            self.events.push(BusEvent::Byte(byte)).unwrap();
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Infallible> {
            self.events.push(BusEvent::Stop).unwrap();
            Ok(())
        }
    }

    /// Bus that accepts a scripted number of bytes, then NACKs
    struct FlakyBus {
        accept: usize,
        written: usize,
    }

    impl I2cBus for FlakyBus {
        type Error = BusError;

        fn start(&mut self) -> Result<(), BusError> {
            Ok(())
        }

        fn write_byte(&mut self, _byte: u8) -> Result<(), BusError> {
            if self.written >= self.accept {
                return Err(BusError::Nack);
            }
            self.written += 1;
            Ok(())
        }

        fn stop(&mut self) -> Result<(), BusError> {
            Ok(())
        }
    }

    fn display_with(
        geometry: PanelGeometry,
        power: PowerSource,
    ) -> Ssd1306<TraceBus, FontRom> {
        let config = OledConfig {
            address: 0x3C,
            geometry,
            power,
        };
        Ssd1306::new(TraceBus::default(), FontRom, config)
    }

    /// Assert a single-command transfer at `at` and return the next index
    fn expect_command(events: &[BusEvent], at: usize, byte: u8) -> usize {
        assert_eq!(
            &events[at..at + 5],
            &[
                BusEvent::Start,
                BusEvent::Byte(ADDR),
                BusEvent::Byte(0x00),
                BusEvent::Byte(byte),
                BusEvent::Stop,
            ],
            "command transfer at event {at}"
        );
        at + 5
    }

    /// Assert a data transfer carrying exactly `payload` and return the
    /// next index
    fn expect_data(events: &[BusEvent], at: usize, payload: &[u8]) -> usize {
        assert_eq!(events[at], BusEvent::Start);
        assert_eq!(events[at + 1], BusEvent::Byte(ADDR));
        assert_eq!(events[at + 2], BusEvent::Byte(0x40));
        for (i, &byte) in payload.iter().enumerate() {
            assert_eq!(events[at + 3 + i], BusEvent::Byte(byte), "data byte {i}");
        }
        assert_eq!(events[at + 3 + payload.len()], BusEvent::Stop);
        at + 4 + payload.len()
    }

    /// The full power-on command stream for a 128x32 panel on the
    /// internal charge pump
    const INIT_128X32_INTERNAL: [u8; 26] = [
        0xAE, 0xD5, 0x80, 0xA8, 0x1F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8, 0xDA,
        0x02, 0x81, 0xFF, 0xD9, 0xF1, 0xDB, 0x20, 0xA4, 0xA6, 0x2E, 0xAF,
    ];

    #[test]
    fn init_sends_the_fixed_sequence() {
        let display = display_with(PanelGeometry::W128xH32, PowerSource::Internal)
            .init()
            .unwrap();
        let (bus, _) = display.free();

        let mut at = 0;
        for &byte in &INIT_128X32_INTERNAL {
            at = expect_command(&bus.events, at, byte);
        }
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn init_adapts_to_geometry_and_power() {
        let expected_128x64_ext: [u8; 26] = [
            0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x10, 0x20, 0x00, 0xA1, 0xC8,
            0xDA, 0x12, 0x81, 0x9F, 0xD9, 0x22, 0xDB, 0x20, 0xA4, 0xA6, 0x2E, 0xAF,
        ];
        let display = display_with(PanelGeometry::W128xH64, PowerSource::External)
            .init()
            .unwrap();
        let (bus, _) = display.free();
        let mut at = 0;
        for &byte in &expected_128x64_ext {
            at = expect_command(&bus.events, at, byte);
        }
        assert_eq!(at, bus.events.len());

        let expected_96x16_int: [u8; 26] = [
            0xAE, 0xD5, 0x80, 0xA8, 0x0F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8,
            0xDA, 0x02, 0x81, 0xAF, 0xD9, 0xF1, 0xDB, 0x20, 0xA4, 0xA6, 0x2E, 0xAF,
        ];
        let display = display_with(PanelGeometry::W96xH16, PowerSource::Internal)
            .init()
            .unwrap();
        let (bus, _) = display.free();
        let mut at = 0;
        for &byte in &expected_96x16_int {
            at = expect_command(&bus.events, at, byte);
        }
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn command_is_one_control_prefixed_transfer() {
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display.command(cmd::INVERT_DISPLAY).unwrap();
        let (bus, _) = display.free();
        let at = expect_command(&bus.events, 0, 0xA7);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn draw_sets_the_cell_window_and_advances() {
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display.set_position(3, 2);
        display.draw_glyphs(None, GlyphRef::digit(7)).unwrap();
        assert_eq!(display.position(), (4, 2));

        let (bus, _) = display.free();
        let mut at = 0;
        // Cell 3 spans columns 12..=16, row 2 is page 1
        for byte in [0x21, 12, 16, 0x22, 1, 1] {
            at = expect_command(&bus.events, at, byte);
        }
        at = expect_data(&bus.events, at, &GLYPH_ROM[35..40]);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn buffer_runs_use_the_same_indexing() {
        let buf: [u8; 20] = core::array::from_fn(|i| i as u8 * 3);
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display
            .draw_glyphs(Some(&buf), GlyphRef { offset: 10, count: 2 })
            .unwrap();
        assert_eq!(display.position(), (3, 1));

        let (bus, _) = display.free();
        let mut at = 0;
        for byte in [0x21, 0, 4, 0x22, 0, 0] {
            at = expect_command(&bus.events, at, byte);
        }
        at = expect_data(&bus.events, at, &buf[10..15]);
        for byte in [0x21, 6, 10, 0x22, 0, 0] {
            at = expect_command(&bus.events, at, byte);
        }
        at = expect_data(&bus.events, at, &buf[15..20]);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn label_run_walks_the_store() {
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display.set_position(1, 1);
        display.draw_glyphs(None, GlyphRef::LABEL).unwrap();
        assert_eq!(display.position(), (11, 1));

        let (bus, _) = display.free();
        let mut at = 0;
        for g in 0..10usize {
            let col = 6 * g as u8;
            for byte in [0x21, col, col + 4, 0x22, 0, 0] {
                at = expect_command(&bus.events, at, byte);
            }
            at = expect_data(&bus.events, at, &GLYPH_ROM[56 + 5 * g..61 + 5 * g]);
        }
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn clear_streams_one_zero_per_ram_byte() {
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display.set_position(5, 2);
        display.clear().unwrap();
        // The cursor survives a clear
        assert_eq!(display.position(), (5, 2));

        let (bus, _) = display.free();
        let mut at = 0;
        for byte in [0x21, 0, 127, 0x22, 0, 3] {
            at = expect_command(&bus.events, at, byte);
        }
        let zeros = [0u8; 512];
        at = expect_data(&bus.events, at, &zeros);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn clear_windows_match_the_panel() {
        let mut display = display_with(PanelGeometry::W96xH16, PowerSource::Internal);
        display.clear().unwrap();

        let (bus, _) = display.free();
        let mut at = 0;
        for byte in [0x21, 0, 95, 0x22, 0, 1] {
            at = expect_command(&bus.events, at, byte);
        }
        let zeros = [0u8; 192];
        at = expect_data(&bus.events, at, &zeros);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn out_of_range_cursor_wraps_like_the_raw_commands() {
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal);
        display.set_position(0, 0);
        display.draw_glyphs(None, GlyphRef::digit(0)).unwrap();

        let (bus, _) = display.free();
        let mut at = 0;
        // Column 0 is one cell left of cell 1: 255 * 6 wraps to 250
        for byte in [0x21, 250, 254, 0x22, 255, 255] {
            at = expect_command(&bus.events, at, byte);
        }
        at = expect_data(&bus.events, at, &GLYPH_ROM[0..5]);
        assert_eq!(at, bus.events.len());
    }

    #[test]
    fn nack_propagates_out_of_init() {
        let config = OledConfig::default();
        let bus = FlakyBus {
            accept: 2,
            written: 0,
        };
        let result = Ssd1306::new(bus, FontRom, config).init();
        assert!(matches!(result, Err(BusError::Nack)));
    }

    #[test]
    fn counter_screen_end_to_end() {
        // The full boot-and-first-reading stream of the counter demo
        let mut display = display_with(PanelGeometry::W128xH32, PowerSource::Internal)
            .init()
            .unwrap();
        display.clear().unwrap();
        display.set_position(1, 1);
        display.draw_glyphs(None, GlyphRef::LABEL).unwrap();
        display.set_position(1, 2);
        for digit in split_digits(1000) {
            display.draw_glyphs(None, GlyphRef::digit(digit)).unwrap();
        }

        let (bus, _) = display.free();
        let mut at = 0;
        for &byte in &INIT_128X32_INTERNAL {
            at = expect_command(&bus.events, at, byte);
        }
        for byte in [0x21, 0, 127, 0x22, 0, 3] {
            at = expect_command(&bus.events, at, byte);
        }
        let zeros = [0u8; 512];
        at = expect_data(&bus.events, at, &zeros);
        for g in 0..10usize {
            let col = 6 * g as u8;
            for byte in [0x21, col, col + 4, 0x22, 0, 0] {
                at = expect_command(&bus.events, at, byte);
            }
            at = expect_data(&bus.events, at, &GLYPH_ROM[56 + 5 * g..61 + 5 * g]);
        }
        for (g, digit) in [1u8, 0, 0, 0].into_iter().enumerate() {
            let col = 6 * g as u8;
            for byte in [0x21, col, col + 4, 0x22, 1, 1] {
                at = expect_command(&bus.events, at, byte);
            }
            let offset = usize::from(digit) * 5;
            at = expect_data(&bus.events, at, &GLYPH_ROM[offset..offset + 5]);
        }
        assert_eq!(at, bus.events.len());
    }
}
