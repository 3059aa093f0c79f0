//! Tally Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040, etc.). This enables the same driver code
//! to run on different hardware platforms - and, under test, on recorded
//! mock hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tally-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tally-drivers (bus + display)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tally-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tally-hal-rp2040 (pin implementations) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`line::BusLine`] - Open-drain bus line (drive low / release / sample)
//! - [`i2c::I2cBus`] - I2C master primitives (start / write byte / stop)
//! - [`rom::ByteRom`] - Read-only byte store (glyph data source)

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod line;
pub mod rom;

// Re-export key traits at crate root for convenience
pub use i2c::{AckPolicy, I2cBus, I2cConfig};
pub use line::BusLine;
pub use rom::ByteRom;
