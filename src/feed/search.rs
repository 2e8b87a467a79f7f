//! View-time search over a source group.

use super::group::SourceGroup;
use crate::source::NewsItem;

/// What a group looks like under the current search term.
#[derive(Debug)]
pub struct FilteredGroup<'a> {
    pub unread: Vec<&'a NewsItem>,
    pub read: Vec<&'a NewsItem>,
    /// Badge count.  Without a term this is the unread count only; with one
    /// it counts matches in both lists.
    pub match_count: usize,
}

/// Filter `group` by a case-insensitive substring of title or summary.
///
/// A blank term returns the stored lists unchanged.  Otherwise the term is
/// matched as typed, surrounding whitespace included.  The group itself is
/// never modified, so this is cheap enough to run on every frame.
pub fn filter<'a>(group: &'a SourceGroup, term: &str) -> FilteredGroup<'a> {
    if term.trim().is_empty() {
        return FilteredGroup {
            unread: group.unread.iter().collect(),
            read: group.read.iter().collect(),
            match_count: group.unread.len(),
        };
    }

    let needle = term.to_lowercase();
    let matches = |item: &&NewsItem| {
        item.title.to_lowercase().contains(&needle) || item.summary.to_lowercase().contains(&needle)
    };
    let unread: Vec<_> = group.unread.iter().filter(matches).collect();
    let read: Vec<_> = group.read.iter().filter(matches).collect();
    let match_count = unread.len() + read.len();

    FilteredGroup {
        unread,
        read,
        match_count,
    }
}
