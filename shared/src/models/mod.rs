//! Domain models for the OEE Monitoring Platform

mod downtime;
mod machine;
mod production;

pub use downtime::*;
pub use machine::*;
pub use production::*;
