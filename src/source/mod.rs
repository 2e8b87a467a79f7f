//! Collaborator abstraction layer.
//!
//! The feed engine talks to the outside world through the traits defined
//! here: one for fetching news, one for persisting read state, and one for
//! the section directory and the user's selection.  The only concrete
//! implementation is [`HttpClient`], which speaks the JSON API.
//!
//! ## For contributors — adding a new backend
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Define a struct and implement the traits it can serve.
//! 3. Add `mod fixture;` below and re-export the struct.
//! 4. Construct it in `main.rs` instead of (or alongside) `HttpClient`.
//!
//! Grouping, read state and the accordion never see the backend type.

mod http;
mod news_item;

pub use http::HttpClient;
pub use news_item::{Language, NewsItem, Section, SectionId, SectionWithNews, Translation};

#[cfg(test)]
pub(crate) use news_item::tests::make_item;

use anyhow::Result;
use async_trait::async_trait;

/// Fetches news for a set of sections.
///
/// Sections with no news may be missing from the response; that is not an
/// error.
#[async_trait]
pub trait NewsFetcher: Send + Sync {
    async fn get_news_by_sections(&self, section_ids: &[SectionId]) -> Result<Vec<SectionWithNews>>;
}

/// Persists per-item read signals.
///
/// Both calls are fire-and-forget commands; nothing in the response is
/// consumed.  The server treats repeats for the same id as no-ops.
#[async_trait]
pub trait ReadStatePersistence: Send + Sync {
    async fn mark_as_read(&self, item_id: &str) -> Result<()>;

    async fn mark_link_clicked(&self, item_id: &str) -> Result<()>;
}

/// Lists every known section and the current user's selection.
#[async_trait]
pub trait SectionCatalog: Send + Sync {
    async fn get_sections(&self) -> Result<Vec<Section>>;

    async fn get_user_sections(&self) -> Result<Vec<SectionId>>;
}
