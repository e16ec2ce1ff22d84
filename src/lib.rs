#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
pub mod config;
mod error;
#[cfg(feature = "std")]
mod files;
pub mod io;
mod scatter;
mod utils;

pub use error::*;
#[cfg(feature = "std")]
pub use files::*;
pub use scatter::*;
