pub mod blacklist;
pub mod message_index;
pub mod resend;
pub mod store;

pub use blacklist::Blacklist;
pub use message_index::MessageIdIndex;
pub use resend::ResendMarker;
pub use store::{spawn_periodic_sweep, InMemoryStore, ProgressStore, RedisStore, SharedStore};
