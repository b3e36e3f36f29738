//! Progressive (infinite-scroll) loading.
//!
//! - [`PageFetcher`] - the host collaborator that supplies pages
//! - [`ProgressiveLoader`] - cursor and `Idle/Loading/Exhausted` state
//! - [`RetryConfig`] - optional bounded retry of failed fetches

mod fetcher;
mod loader;
mod retry;

pub use fetcher::*;
pub use loader::*;
pub use retry::*;
