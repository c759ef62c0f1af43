//! # jkbms_lib
//!
//! This crate provides a library for reading telemetry from JK BMS (Battery
//! Management System) devices over their proprietary RS485 protocol.
//!
//! The heart of the crate is the [`protocol`] module: it builds the
//! checksummed read-all-data request frame and decodes the tagged-field
//! response buffer into a [`protocol::BmsReading`]. Decoding is deliberately
//! lenient - every field is looked up independently and a missing or
//! truncated field resolves to `None` instead of aborting the whole decode.
//!
//! ## Features
//!
//! This crate uses a feature-based system to keep dependencies minimal.
//!
//! - `default`: Enables `bin-dependencies`, which is intended for compiling
//!   the `jkbms` command-line tool.
//! - `serialport`: Enables the synchronous serial client using the
//!   `serialport` crate.
//! - `bin-dependencies`: Enables all features required by the `jkbms`
//!   binary executable.

/// Contains error types for the library.
mod error;
/// Defines the communication protocol for JK BMS.
pub mod protocol;

pub use error::Error;

/// Synchronous client for JK BMS communication.
#[cfg(feature = "serialport")]
pub mod serialport;
