//! Building the per-section view from a fetch response.

use std::collections::{HashMap, HashSet};

use tracing::{error, info};

use super::group::{group, SourceGroup};
use super::names::format_section_name;
use super::FeedError;
use crate::source::{NewsFetcher, Section, SectionId, SectionWithNews};

/// Label for a selected section that neither the response nor the directory
/// knows about.
pub const UNKNOWN_SECTION: &str = "Unknown Section";

/// One section of the feed view.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWithGroups {
    pub section_id: SectionId,
    pub name: String,
    pub groups: Vec<SourceGroup>,
}

/// Cached section-id → display-name lookup, used when a selected section is
/// missing from the fetch response.
#[derive(Debug, Clone, Default)]
pub struct SectionDirectory {
    names: HashMap<SectionId, String>,
}

impl SectionDirectory {
    /// Build the cache from the directory listing, formatting every name for
    /// display.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            names: sections
                .into_iter()
                .map(|s| (s.id, format_section_name(&s.name)))
                .collect(),
        }
    }

    pub fn name(&self, id: SectionId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Result of a load that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Ready(Vec<SectionWithGroups>),
    /// Nothing to show; the fetcher was never called.
    NoSectionsSelected,
}

/// Merge a fetch response into the selection's order.
///
/// `selection` decides which sections appear and in what order; a repeated
/// id is shown once, at its first position.  Sections absent from `fetched`
/// get a directory (or [`UNKNOWN_SECTION`]) name and no groups.
pub fn aggregate(
    selection: &[SectionId],
    fetched: Vec<SectionWithNews>,
    directory: &SectionDirectory,
) -> Vec<SectionWithGroups> {
    let mut by_id: HashMap<SectionId, SectionWithNews> =
        fetched.into_iter().map(|s| (s.section_id, s)).collect();
    let mut seen = HashSet::new();

    selection
        .iter()
        .filter(|&&id| seen.insert(id))
        .map(|&id| match by_id.remove(&id) {
            Some(section) => SectionWithGroups {
                section_id: id,
                name: section.section_name,
                groups: group(section.news),
            },
            None => SectionWithGroups {
                section_id: id,
                name: directory.name(id).unwrap_or(UNKNOWN_SECTION).to_string(),
                groups: Vec::new(),
            },
        })
        .collect()
}

/// Fetch the selected sections and aggregate them.
///
/// An empty selection short-circuits before any request is made.  A failed
/// fetch aggregates nothing.
pub async fn load(
    selection: &[SectionId],
    fetcher: &dyn NewsFetcher,
    directory: &SectionDirectory,
) -> Result<LoadOutcome, FeedError> {
    if selection.is_empty() {
        info!("no sections selected; skipping fetch");
        return Ok(LoadOutcome::NoSectionsSelected);
    }

    let fetched = fetcher
        .get_news_by_sections(selection)
        .await
        .map_err(|e| {
            error!(error = %e, sections = ?selection, "failed to fetch news");
            FeedError::Fetch(e.into())
        })?;

    let sections = aggregate(selection, fetched, directory);
    info!(
        sections = sections.len(),
        groups = sections.iter().map(|s| s.groups.len()).sum::<usize>(),
        "news loaded"
    );
    Ok(LoadOutcome::Ready(sections))
}
