//! Kernel text output.
//!
//! Everything goes to the serial port; see [`crate::serial`].

pub mod macros;
