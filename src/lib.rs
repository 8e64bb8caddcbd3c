#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod circular;
pub mod interpolate;

pub use circular::{capacity_for, CircularBuffer, DEFAULT_BUFFER_SIZE};
pub use interpolate::linear_interpolate;
