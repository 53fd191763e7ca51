//! Domain entities and events.

pub mod entities;
pub mod events;

pub use entities::*;
pub use events::*;
