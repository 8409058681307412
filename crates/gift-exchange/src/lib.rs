//! Core library for the gift-exchange draw service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
