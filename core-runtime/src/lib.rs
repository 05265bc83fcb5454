//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media capture core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the capture core depends on. It
//! establishes the logging conventions, the fail-fast configuration builder
//! that collects host bridges, and the broadcast channel capture sessions
//! report progress on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
