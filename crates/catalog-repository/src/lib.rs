//! # Catalog Repository
//!
//! The product store: a [`ProductRepository`] trait for the service layer
//! and its MySQL implementation on top of a SQLx connection pool.

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
