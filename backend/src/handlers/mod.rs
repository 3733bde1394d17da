//! HTTP handlers for the OEE Monitoring Platform

mod downtime;
mod health;
mod machine;
mod metrics;
mod production;

pub use downtime::*;
pub use health::*;
pub use machine::*;
pub use metrics::*;
pub use production::*;
