//! # Catalog Server Library
//!
//! Dependency injection wiring and startup utilities for the catalog
//! server binary.

pub mod di;
pub mod startup;
