//! # mibridge-domain
//!
//! Pure domain model for the mibridge Home Assistant discovery bridge.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, delivery levels
//! - Define **Sensors** (physical Xiaomi/Aqara devices known to the registry)
//! - Define **Sensor models** (the closed vocabulary of supported hardware)
//! - Define **Device settings** and the process-wide **application identity**
//! - Define **Discovery payloads** (the JSON documents Home Assistant consumes)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod qos;

pub mod config;
pub mod discovery;
pub mod sensor;
