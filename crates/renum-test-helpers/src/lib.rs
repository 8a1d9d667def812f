//! Test utilities and fixtures for renum
//!
//! This crate provides shared test helpers that can be used by both
//! integration tests and benchmarks of the other crates.

pub mod fixtures;
pub mod mocks;
