//! Business logic services for the OEE Monitoring Platform

pub mod downtime;
pub mod machine;
pub mod metrics;
pub mod production;
