//! Wire protocol for the UM-series USB power meter.
//!
//! The meter answers a one-byte poll with a fixed 130-byte binary frame.
//! This crate reassembles those frames from arbitrarily chunked stream
//! reads ([`assembler::PacketAssembler`]) and decodes them into typed,
//! scaled measurements ([`telemetry::Telemetry`]). No I/O happens here;
//! the client crate owns the stream.

pub mod assembler;
pub mod frame;
pub mod telemetry;

pub use assembler::PacketAssembler;
pub use frame::{FRAME_LEN, Frame, FramingError, POLL_REQUEST};
pub use telemetry::{EnergyGroup, Telemetry};
