//! Application core: the measurement cycle, zero I/O.
//!
//! The cycle runner sequences the sample window, one-shot sensor reads,
//! report assembly, publishing and fault escalation. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
