//! Open/close discipline for the section → source group → item tree.
//!
//! At most one source group is open across the whole tree.  Inside a group
//! at most one item is open, but that rule is local to the group: opening an
//! item never touches open items of other groups.  Collapsing a group (or
//! moving away from an item) counts as having read whatever was open.

use tracing::{debug, info, warn};

use super::aggregate::SectionWithGroups;
use super::group::SourceGroup;
use super::read_state::ReadStateTracker;

/// Position of a group in the tree: section index, then group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPath {
    pub section: usize,
    pub group: usize,
}

impl GroupPath {
    pub fn new(section: usize, group: usize) -> Self {
        Self { section, group }
    }
}

/// Owns one feed view and mediates every interaction with it.
#[derive(Debug)]
pub struct Accordion {
    sections: Vec<SectionWithGroups>,
    tracker: ReadStateTracker,
}

fn locate(sections: &mut [SectionWithGroups], path: GroupPath) -> Option<&mut SourceGroup> {
    sections
        .get_mut(path.section)
        .and_then(|s| s.groups.get_mut(path.group))
}

impl Accordion {
    pub fn new(sections: Vec<SectionWithGroups>, tracker: ReadStateTracker) -> Self {
        Self { sections, tracker }
    }

    pub fn sections(&self) -> &[SectionWithGroups] {
        &self.sections
    }

    pub fn group(&self, path: GroupPath) -> Option<&SourceGroup> {
        self.sections
            .get(path.section)
            .and_then(|s| s.groups.get(path.group))
    }

    /// Path of the group holding `item_id`, if any.
    pub fn find_item(&self, item_id: &str) -> Option<GroupPath> {
        self.sections.iter().enumerate().find_map(|(si, section)| {
            section
                .groups
                .iter()
                .position(|g| g.find(item_id).is_some())
                .map(|gi| GroupPath::new(si, gi))
        })
    }

    pub fn unread_total(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.groups)
            .map(|g| g.unread.len())
            .sum()
    }

    /// Open the group at `path`, or close it if it is already open.
    ///
    /// Either way every group in every section is collapsed first, and any
    /// item left open in one of them is marked read.
    pub fn toggle_group(&mut self, path: GroupPath) {
        let Some(was_open) = self.group(path).map(|g| g.is_open) else {
            warn!(?path, "toggle of unknown group");
            return;
        };

        for section in &mut self.sections {
            for group in &mut section.groups {
                if let Some(open) = group.open_item_id.take() {
                    self.tracker.mark_read(group, &open);
                }
                group.is_open = false;
            }
        }

        if !was_open {
            if let Some(group) = locate(&mut self.sections, path) {
                group.is_open = true;
            }
        }
        debug!(?path, open = !was_open, "group toggled");
    }

    /// Expand `item_id` inside the group at `path`, or collapse it if it is
    /// the group's open item.
    ///
    /// Collapsing an item, or replacing it with another one, marks it read.
    pub fn toggle_item(&mut self, path: GroupPath, item_id: &str) {
        let Some(group) = locate(&mut self.sections, path) else {
            warn!(?path, "toggle of item in unknown group");
            return;
        };
        if group.find(item_id).is_none() {
            warn!(?path, item = item_id, "toggle of unknown item");
            return;
        }

        match group.open_item_id.take() {
            Some(open) if open == item_id => {
                self.tracker.mark_read(group, &open);
            }
            Some(previous) => {
                self.tracker.mark_read(group, &previous);
                group.open_item_id = Some(item_id.to_string());
            }
            None => group.open_item_id = Some(item_id.to_string()),
        }
    }

    /// Record that the user followed the item's link.
    ///
    /// Unread items are marked read first.  Returns the URL for the caller to
    /// open; `None` when the item is not part of this view.
    pub fn open_link(&mut self, item_id: &str) -> Option<String> {
        let path = self.find_item(item_id)?;
        let group = locate(&mut self.sections, path)?;
        let link = group.find(item_id)?.link.clone();

        if !self.tracker.mark_read_and_clicked(group, item_id) {
            self.tracker.mark_link_clicked(item_id);
        }
        info!(item = item_id, %link, "opening link");
        Some(link)
    }

    /// Move the section at `from` so it ends up at `to`.
    ///
    /// Out-of-range indices are clamped to the last section.  This only
    /// changes the view; the user's stored selection is untouched.
    pub fn move_section(&mut self, from: usize, to: usize) {
        if self.sections.is_empty() {
            return;
        }
        let last = self.sections.len() - 1;
        let (from, to) = (from.min(last), to.min(last));
        if from != to {
            let section = self.sections.remove(from);
            self.sections.insert(to, section);
        }
    }
}
