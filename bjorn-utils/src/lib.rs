/// Bounded, time-expiring cache with deduplicated fetches.
pub mod cache;
/// Generic embed builders shared across commands.
pub mod embed;
/// Single-flight deduplication of concurrent fetches.
pub mod flight;
/// Stateless pagination engine, codec and interaction helpers.
pub mod pagination;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

pub use cache::Cache;
pub use flight::{FetchError, FlightGroup};
