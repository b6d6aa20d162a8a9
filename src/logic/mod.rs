//! Logic Module - Business Logic & Engines
//!
//! Engines: Recognizer (Bayesian belief fusion), Session (tick loop),
//! Catalog (equipment reference data).

pub mod catalog;
pub mod recognizer;
pub mod session;
