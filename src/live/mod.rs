//! Live entity states feeding the binding overlay

mod feed;
mod protocol;
mod snapshot;

pub use feed::{ChannelState, FeedCommand, FeedConfig, LiveFeed};
pub use protocol::{
    sanitize_entity_ids, BatchRequest, BatchResponse, ClientMessage, ServerMessage, MAX_ENTITY_IDS,
};
pub use snapshot::{EntityState, Snapshot};
