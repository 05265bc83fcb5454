//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service`, `core-capture`). Host applications can
//! depend on `capture-workspace` and enable `desktop-shims` for the complete
//! camera façade, or `core-only` to wire the capture core against their own
//! bridge implementations.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "core-only")]
pub use core_capture as capture;
