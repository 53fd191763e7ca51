//! Domain events.

mod product_events;

pub use product_events::*;
