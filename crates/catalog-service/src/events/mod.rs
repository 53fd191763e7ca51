//! Product event notification.
//!
//! Created products are announced on a Redis pub/sub channel. Delivery is
//! fire-and-forget: nothing is queued or retried, and subscribers that are
//! not connected at publish time never see the event.

mod listener;
mod publisher;
mod redis_publisher;

pub use listener::ProductEventListener;
pub use publisher::{NoopProductEventPublisher, ProductEventPublisher};
pub use redis_publisher::{RedisProductEventPublisher, RedisProductEventPublisherParameters};
