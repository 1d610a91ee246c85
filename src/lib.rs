pub mod avatar_fetcher;
pub mod config;
pub mod error;
pub mod gravatar;
pub mod profile_avatar_handler;
pub mod request_meta;
pub mod server;
pub mod signal_store;

#[cfg(test)]
mod tests;

pub use avatar_fetcher::{AvatarFetcher, AvatarFetcherConfig, FetchError};
pub use config::Config;
pub use error::ProxyError;
pub use gravatar::{email_hash, normalize_email, parse_size, GravatarUrlBuilder};
pub use profile_avatar_handler::{profile_avatar_handler, AppState, ProfileQuery};
pub use server::create_router;
pub use signal_store::{PgSignalStore, PgSignalStoreConfig, Signal, SignalStore, SignalStoreError};
