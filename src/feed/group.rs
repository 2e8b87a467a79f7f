//! Grouping a section's items by originating source.

use std::collections::HashMap;

use super::names::source_domain;
use crate::source::NewsItem;

/// Items of one section that share a source, split by read state.
///
/// Every item of the group lives in exactly one of `unread` / `read`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup {
    /// Grouping key, normally the source's domain.
    pub key: String,
    pub unread: Vec<NewsItem>,
    /// Most recently read first once the session starts marking items.
    pub read: Vec<NewsItem>,
    pub is_open: bool,
    /// The item currently expanded inside this group.
    pub open_item_id: Option<String>,
}

impl SourceGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            unread: Vec::new(),
            read: Vec::new(),
            is_open: false,
            open_item_id: None,
        }
    }

    /// Look an item up in either list.
    pub fn find(&self, item_id: &str) -> Option<&NewsItem> {
        self.unread
            .iter()
            .chain(self.read.iter())
            .find(|item| item.id == item_id)
    }
}

/// Group `items` by [`source_domain`] of their source URL.
pub fn group(items: Vec<NewsItem>) -> Vec<SourceGroup> {
    group_by(items, |item| source_domain(&item.source_url))
}

/// Group `items` by an arbitrary key.
///
/// Groups appear in the order their key is first seen; inside a group the
/// unread and read lists keep the input's relative order.
pub fn group_by<F>(items: Vec<NewsItem>, key_of: F) -> Vec<SourceGroup>
where
    F: Fn(&NewsItem) -> String,
{
    let mut groups: Vec<SourceGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = key_of(&item);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(SourceGroup::new(key));
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        if item.is_read {
            group.read.push(item);
        } else {
            group.unread.push(item);
        }
    }

    groups
}
