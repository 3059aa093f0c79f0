//! Bus driver implementations

pub mod soft_i2c;

pub use soft_i2c::{BusError, SoftI2c};
