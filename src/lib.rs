#![no_std]

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod protocol;
pub mod registers;

pub use crate::device::As7265x;
pub use crate::error::{Error, Result};
