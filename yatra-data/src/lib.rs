//! Remote data access for the Yatra engine.
//!
//! Responsibilities:
//! - Implement the core's source traits against real services.
//! - Own wire formats and their decoding.
//!
//! Boundaries:
//! - Do not encode catalog rules (ordering of ties, filtering and favorite
//!   state live in `yatra-core`).
//! - Keep requests async; never block an executor thread.

pub mod rest;
