//! RP2040-specific HAL for the Tally firmware
//!
//! This crate provides RP2040 implementations of the shared `tally-hal`
//! traits:
//!
//! - Open-drain bus lines emulated over `Flex` GPIO pads

#![no_std]

pub mod gpio;

pub use gpio::OpenDrainFlex;
