//! # Gateway HA Test cases
//!
//! This subproject provides multi-node election scenarios over the in-process network.

#[macro_use]
extern crate log;
pub mod cases;
mod steps;

pub use self::cases::smoke;
