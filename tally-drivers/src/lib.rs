//! Hardware driver implementations
//!
//! This crate provides the platform-independent drivers of the Tally
//! stack, written against the traits defined in tally-hal:
//!
//! - Software I2C master (bit-banged over two open-drain GPIO lines)
//! - SSD1306 OLED controller driver (5x7 glyph text, no frame buffer)
//! - Glyph table matching the on-device byte layout
//!
//! Everything here is blocking and allocation-free, so the same code
//! runs on the target and under host tests against mock hardware.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod oled;
