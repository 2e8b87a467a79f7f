//! Background news loading.
//!
//! Runs on a spawned task: resolves the section directory and the user's
//! selection, fetches the news, and sends exactly one [`LoadMsg`] back to the
//! UI loop over a channel.
//!
//! ## For contributors
//!
//! A reload is just another call to [`spawn`]; the UI keeps whichever
//! receiver it got last, so a stale load finishing late is ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::feed::{self, LoadOutcome, SectionDirectory, SectionWithGroups};
use crate::source::{NewsFetcher, SectionCatalog, SectionId};

/// Messages sent from the loader task to the UI loop.
#[derive(Debug)]
pub enum LoadMsg {
    Sections(Vec<SectionWithGroups>),
    NoSectionsSelected,
    /// A user-facing error description.
    Error(String),
}

/// Spawn a load.
///
/// `selection` comes from the command line; `None` means "ask the API for
/// the user's saved sections".
pub fn spawn(
    fetcher: Arc<dyn NewsFetcher>,
    catalog: Arc<dyn SectionCatalog>,
    selection: Option<Vec<SectionId>>,
) -> mpsc::UnboundedReceiver<LoadMsg> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let msg = run(fetcher.as_ref(), catalog.as_ref(), selection).await;
        // The UI may have started a newer load and dropped this receiver.
        let _ = tx.send(msg);
    });

    rx
}

async fn run(
    fetcher: &dyn NewsFetcher,
    catalog: &dyn SectionCatalog,
    selection: Option<Vec<SectionId>>,
) -> LoadMsg {
    let directory = match catalog.get_sections().await {
        Ok(sections) => SectionDirectory::new(sections),
        Err(e) => {
            warn!(error = %e, "section directory unavailable; falling back to generic names");
            SectionDirectory::default()
        }
    };
    info!(entries = directory.len(), "section directory ready");

    let selection = match selection {
        Some(ids) => ids,
        None => match catalog.get_user_sections().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "failed to load user sections");
                return LoadMsg::Error("Failed to load your sections.".into());
            }
        },
    };

    match feed::load(&selection, fetcher, &directory).await {
        Ok(LoadOutcome::Ready(sections)) => LoadMsg::Sections(sections),
        Ok(LoadOutcome::NoSectionsSelected) => LoadMsg::NoSectionsSelected,
        Err(e) => LoadMsg::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{make_item, Section, SectionWithNews};
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    struct Fixture {
        directory_ok: bool,
        user_sections: Vec<SectionId>,
        news: Vec<SectionWithNews>,
    }

    #[async_trait]
    impl NewsFetcher for Fixture {
        async fn get_news_by_sections(&self, ids: &[SectionId]) -> Result<Vec<SectionWithNews>> {
            Ok(self
                .news
                .iter()
                .filter(|s| ids.contains(&s.section_id))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl SectionCatalog for Fixture {
        async fn get_sections(&self) -> Result<Vec<Section>> {
            if !self.directory_ok {
                bail!("directory down");
            }
            Ok(vec![Section {
                id: 2,
                name: "local_news".into(),
            }])
        }

        async fn get_user_sections(&self) -> Result<Vec<SectionId>> {
            Ok(self.user_sections.clone())
        }
    }

    fn fixture(directory_ok: bool, user_sections: Vec<SectionId>) -> Arc<Fixture> {
        Arc::new(Fixture {
            directory_ok,
            user_sections,
            news: vec![SectionWithNews {
                section_id: 1,
                section_name: "World".into(),
                news: vec![make_item("1", "https://a.com", false)],
            }],
        })
    }

    #[tokio::test]
    async fn uses_saved_selection_and_directory_names() {
        let f = fixture(true, vec![2, 1]);
        let mut rx = spawn(f.clone(), f, None);

        let Some(LoadMsg::Sections(sections)) = rx.recv().await else {
            panic!("expected sections");
        };
        assert_eq!(sections[0].name, "local news");
        assert_eq!(sections[1].name, "World");
    }

    #[tokio::test]
    async fn directory_failure_is_not_fatal() {
        let f = fixture(false, Vec::new());
        let mut rx = spawn(f.clone(), f, Some(vec![2]));

        let Some(LoadMsg::Sections(sections)) = rx.recv().await else {
            panic!("expected sections");
        };
        assert_eq!(sections[0].name, feed::UNKNOWN_SECTION);
    }

    #[tokio::test]
    async fn empty_saved_selection() {
        let f = fixture(true, Vec::new());
        let mut rx = spawn(f.clone(), f, None);
        assert!(matches!(rx.recv().await, Some(LoadMsg::NoSectionsSelected)));
    }
}
