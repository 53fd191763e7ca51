//! # Catalog Service
//!
//! Business logic for the catalog: the product use cases, the read-through
//! product cache, and product event notification.

pub mod cache;
pub mod dto;
pub mod events;
pub mod mappers;
pub mod product_service;
pub mod r#impl;

pub use cache::*;
pub use dto::*;
pub use events::*;
pub use product_service::*;
pub use r#impl::*;
