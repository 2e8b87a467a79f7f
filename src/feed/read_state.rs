//! The unread → read transition.
//!
//! Every code path that reveals an item ends up here.  The transition is
//! applied locally first and only then announced on the command channel.  A
//! failed command is never compensated.

use tracing::{debug, warn};

use super::group::SourceGroup;
use crate::persist::{Command, CommandSink};

/// Applies read transitions and emits the matching persistence commands.
#[derive(Debug, Clone)]
pub struct ReadStateTracker {
    commands: CommandSink,
}

impl ReadStateTracker {
    pub fn new(commands: CommandSink) -> Self {
        Self { commands }
    }

    /// Mark `item_id` read within `group`.
    ///
    /// Returns `true` when the item moved from unread to read.  Calling it
    /// for an already-read or unknown item does nothing.
    pub fn mark_read(&self, group: &mut SourceGroup, item_id: &str) -> bool {
        let moved = transition(group, item_id);
        if moved {
            self.send(Command::MarkRead(item_id.to_string()));
        }
        moved
    }

    /// Like [`mark_read`](Self::mark_read) but issues a combined command that
    /// also records a link click once the read is confirmed.
    pub fn mark_read_and_clicked(&self, group: &mut SourceGroup, item_id: &str) -> bool {
        let moved = transition(group, item_id);
        if moved {
            self.send(Command::MarkReadThenLinkClicked(item_id.to_string()));
        }
        moved
    }

    pub fn mark_link_clicked(&self, item_id: &str) {
        self.send(Command::MarkLinkClicked(item_id.to_string()));
    }

    fn send(&self, cmd: Command) {
        debug!(?cmd, "dispatching");
        if self.commands.send(cmd).is_err() {
            warn!("command worker is gone; read state will not be persisted");
        }
    }
}

/// Move an unread item to the front of the read list.
fn transition(group: &mut SourceGroup, item_id: &str) -> bool {
    let Some(pos) = group.unread.iter().position(|item| item.id == item_id) else {
        return false;
    };
    let mut item = group.unread.remove(pos);
    item.is_read = true;
    group.read.insert(0, item);
    true
}
