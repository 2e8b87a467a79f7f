//! Background delivery of read-state commands.
//!
//! The feed engine never awaits the server.  It pushes a [`Command`] onto an
//! unbounded channel and carries on; a worker task drains the channel and
//! runs each command as its own detached task.
//!
//! ## For contributors
//!
//! Failures are logged and dropped.  The local read state has already moved
//! on by the time a command is sent, and nothing here tries to undo it or
//! retry.  Commands for different items may finish in any order; the server
//! treats repeats by id as no-ops.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::source::ReadStatePersistence;

/// A read-state signal for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MarkRead(String),
    MarkLinkClicked(String),
    /// Mark read, then record the link click once the first call succeeded.
    MarkReadThenLinkClicked(String),
}

/// Sending half handed to the engine.
pub type CommandSink = mpsc::UnboundedSender<Command>;

/// Create a command channel.
pub fn channel() -> (CommandSink, mpsc::UnboundedReceiver<Command>) {
    mpsc::unbounded_channel()
}

/// Spawn the worker that delivers commands to `persistence`.
///
/// The worker exits once every [`CommandSink`] has been dropped; the returned
/// handle resolves at that point.  Commands already handed to their own
/// tasks keep running to completion.
pub fn spawn(
    persistence: Arc<dyn ReadStatePersistence>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            let persistence = Arc::clone(&persistence);
            tokio::spawn(async move { deliver(persistence.as_ref(), cmd).await });
        }
        debug!("command channel closed");
    })
}

/// Run a single command against `persistence`, logging any failure.
pub async fn deliver(persistence: &dyn ReadStatePersistence, cmd: Command) {
    match cmd {
        Command::MarkRead(id) => {
            if let Err(e) = persistence.mark_as_read(&id).await {
                warn!(item = %id, error = %e, "mark as read failed");
            }
        }
        Command::MarkLinkClicked(id) => {
            if let Err(e) = persistence.mark_link_clicked(&id).await {
                warn!(item = %id, error = %e, "mark link clicked failed");
            }
        }
        Command::MarkReadThenLinkClicked(id) => match persistence.mark_as_read(&id).await {
            Ok(()) => {
                if let Err(e) = persistence.mark_link_clicked(&id).await {
                    warn!(item = %id, error = %e, "mark link clicked failed");
                }
            }
            Err(e) => warn!(item = %id, error = %e, "mark as read failed; link click not recorded"),
        },
    }
}
