//! # mibridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MessagePublisher` — publish a payload to a topic with QoS and retain
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DiscoveryPropagator` — announce each sensor to Home Assistant once
//! - Orchestrate domain objects without knowing *how* messages reach the broker
//!
//! ## Dependency rule
//! Depends on `mibridge-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
