//! Middleware for the OEE Monitoring Platform

mod auth;

pub use auth::*;
