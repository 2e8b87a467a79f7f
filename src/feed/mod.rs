//! The news aggregation and read-state engine.
//!
//! ```text
//! load()        aggregate()        group()
//! fetcher ───► selection order ───► source groups ───► Accordion
//!                                                       │  toggle_group / toggle_item / open_link
//!                                                       ▼
//!                                                ReadStateTracker ───► persist::Command
//! ```
//!
//! * **`group`** — splits one section's items into per-source groups.
//! * **`aggregate`** — orders sections by the user's selection and fills
//!   gaps from the section directory.
//! * **`read_state`** — the one place an item becomes read.
//! * **`accordion`** — owns the tree and the single-open-panel rules.
//! * **`search`** — render-time filtering; never mutates.
//!
//! Nothing in here awaits a server round trip except [`load`].

mod accordion;
mod aggregate;
mod group;
mod names;
mod read_state;
mod search;

pub use accordion::{Accordion, GroupPath};
pub use aggregate::{
    aggregate, load, LoadOutcome, SectionDirectory, SectionWithGroups, UNKNOWN_SECTION,
};
pub use read_state::ReadStateTracker;
pub use search::filter;

use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The fetch collaborator failed.  Nothing was aggregated.
    #[error("Failed to load news.")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Message shown when the user has not selected any sections.
pub const NO_SECTIONS_MESSAGE: &str = "No sections selected. Please select sections first.";
