//! Shared types and models for the OEE Monitoring Platform
//!
//! This crate contains the OEE calculation engine and the types shared
//! between the backend, frontend (via WASM), and other components of the
//! system.

pub mod models;
pub mod oee;
pub mod types;
pub mod validation;

pub use models::*;
pub use oee::*;
pub use types::*;
pub use validation::*;
