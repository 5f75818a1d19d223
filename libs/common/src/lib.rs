//! Common library for the Netclicks application
//!
//! This crate provides shared functionality used across the Netclicks
//! services, including database connectivity and error handling.

pub mod database;
pub mod error;
