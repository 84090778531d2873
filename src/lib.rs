//! Weather station firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

// The hardware halves of the adapters import the ESP-IDF crates, which
// only the `espidf` feature pulls in.
#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for target_os = \"espidf\" requires `--features espidf`");

pub mod app;
pub mod config;
pub mod error;
pub mod fault;
pub mod metrics;
pub mod pins;
pub mod publisher;
pub mod report;
pub mod sampler;

// The ESP-IDF implementations inside these are cfg-gated; on the host
// they compile to simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;
