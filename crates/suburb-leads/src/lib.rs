//! Core library for the Sandton suburb insight service: static suburb and
//! agent reference data, deterministic agent matching, and consent-guarded
//! lead capture backed by an embedded SQLite store.

pub mod config;
pub mod error;
pub mod leads;
pub mod reference;
pub mod telemetry;
