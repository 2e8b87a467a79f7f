use crate::feed::{filter, Accordion, GroupPath, ReadStateTracker, NO_SECTIONS_MESSAGE};
use crate::load::LoadMsg;
use crate::persist::CommandSink;
use crate::source::Language;

use ratatui::widgets::ListState;

/// What the main area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    /// An informational or error message instead of the feed.
    Message(String),
    Feed,
}

/// One visible line of the accordion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section(usize),
    Group(GroupPath),
    Item(GroupPath, String),
}

pub struct App {
    pub view: View,
    /// The loaded feed, present once a load succeeded.
    pub feed: Option<Accordion>,
    /// Cursor over [`App::rows`].
    pub list_state: ListState,
    pub search: String,
    /// Whether keystrokes go to the search box.
    pub searching: bool,
    pub language: Language,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Whether the user asked for a fresh load.
    pub reload: bool,
    /// A link the main loop should hand to the browser.
    pub pending_link: Option<String>,
    /// Last status message.
    pub status: String,
    commands: CommandSink,
}

impl App {
    pub fn new(commands: CommandSink, language: Language) -> Self {
        Self {
            view: View::Loading,
            feed: None,
            list_state: ListState::default(),
            search: String::new(),
            searching: false,
            language,
            quit: false,
            reload: false,
            pending_link: None,
            status: "Loading…".into(),
            commands,
        }
    }

    /// Apply the result of a background load.
    ///
    /// A successful load replaces the whole tree; nothing is carried over
    /// from the previous one.
    pub fn apply_load(&mut self, msg: LoadMsg) {
        match msg {
            LoadMsg::Sections(sections) => {
                let count = sections.len();
                let tracker = ReadStateTracker::new(self.commands.clone());
                self.feed = Some(Accordion::new(sections, tracker));
                self.view = View::Feed;
                self.list_state = ListState::default();
                self.select_first();
                self.status = format!("Loaded {count} sections");
            }
            LoadMsg::NoSectionsSelected => {
                self.feed = None;
                self.view = View::Message(NO_SECTIONS_MESSAGE.into());
                self.status = "No sections".into();
            }
            LoadMsg::Error(e) => {
                self.feed = None;
                self.view = View::Message(e.clone());
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Visible rows under the current search term.
    ///
    /// While searching, groups without a match are hidden.  Items are only
    /// listed for the open group: unread first, then read.
    pub fn rows(&self) -> Vec<Row> {
        let Some(feed) = &self.feed else {
            return Vec::new();
        };
        let searching = !self.search.trim().is_empty();
        let mut rows = Vec::new();

        for (si, section) in feed.sections().iter().enumerate() {
            rows.push(Row::Section(si));
            for (gi, group) in section.groups.iter().enumerate() {
                let path = GroupPath::new(si, gi);
                let filtered = filter(group, &self.search);
                if searching && filtered.match_count == 0 {
                    continue;
                }
                rows.push(Row::Group(path));
                if group.is_open {
                    rows.extend(
                        filtered
                            .unread
                            .iter()
                            .chain(filtered.read.iter())
                            .map(|item| Row::Item(path, item.id.clone())),
                    );
                }
            }
        }
        rows
    }

    fn selected_row(&self) -> Option<Row> {
        let i = self.list_state.selected()?;
        self.rows().into_iter().nth(i)
    }

    /// Move the cursor onto `row` if it is visible, otherwise clamp it.
    fn follow(&mut self, row: &Row) {
        let rows = self.rows();
        match rows.iter().position(|r| r == row) {
            Some(i) => self.list_state.select(Some(i)),
            None if rows.is_empty() => self.list_state.select(None),
            None => {
                let i = self.list_state.selected().unwrap_or(0).min(rows.len() - 1);
                self.list_state.select(Some(i));
            }
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.rows().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.rows().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    // -- feed actions --------------------------------------------------------

    /// Expand or collapse whatever is under the cursor.
    pub fn activate(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        match &row {
            Row::Section(_) => return,
            Row::Group(path) => feed.toggle_group(*path),
            Row::Item(path, id) => feed.toggle_item(*path, id),
        }
        self.follow(&row);
    }

    /// Open the link of the item under the cursor.
    pub fn open_selected(&mut self) {
        let Some(Row::Item(path, id)) = self.selected_row() else {
            return;
        };
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        if let Some(link) = feed.open_link(&id) {
            self.status = format!("Opening {link}");
            self.pending_link = Some(link);
        }
        // Reading moves the item within its group.
        self.follow(&Row::Item(path, id));
    }

    fn selected_section(&self) -> Option<usize> {
        match self.selected_row()? {
            Row::Section(s) => Some(s),
            Row::Group(p) | Row::Item(p, _) => Some(p.section),
        }
    }

    /// Move the section under the cursor one place up (`-1`) or down (`1`).
    pub fn move_section(&mut self, delta: isize) {
        let Some(from) = self.selected_section() else {
            return;
        };
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        let Some(to) = from.checked_add_signed(delta) else {
            return;
        };
        if to >= feed.sections().len() {
            return;
        }
        feed.move_section(from, to);
        self.follow(&Row::Section(to));
    }

    /// Switch to the next language that any loaded item is translated into.
    pub fn cycle_language(&mut self) {
        let mut codes = vec![Language::default().code().to_string()];
        if let Some(feed) = &self.feed {
            for item in feed
                .sections()
                .iter()
                .flat_map(|s| &s.groups)
                .flat_map(|g| g.unread.iter().chain(g.read.iter()))
            {
                for t in &item.translations {
                    let code = Language::new(&t.language_code).code().to_string();
                    if !codes.contains(&code) {
                        codes.push(code);
                    }
                }
            }
        }
        let next = codes
            .iter()
            .position(|c| c == self.language.code())
            .map_or(0, |i| (i + 1) % codes.len());
        self.language = Language::new(&codes[next]);
        self.status = format!("Language: {}", self.language.code());
    }

    // -- search --------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.searching = true;
    }

    pub fn finish_search(&mut self) {
        self.searching = false;
    }

    pub fn cancel_search(&mut self) {
        self.searching = false;
        self.search.clear();
        self.select_first();
    }

    pub fn push_search(&mut self, c: char) {
        self.search.push(c);
        self.select_first();
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
        self.select_first();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{aggregate, SectionDirectory};
    use crate::persist::{self, Command};
    use crate::source::{make_item, SectionWithNews, Translation};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn loaded_app() -> (App, UnboundedReceiver<Command>) {
        let mut translated = make_item("a2", "https://a.com", false);
        translated.translations.push(Translation {
            language_code: "DE".into(),
            title: "Titel".into(),
            summary: "Zusammenfassung".into(),
        });
        let fetched = vec![
            SectionWithNews {
                section_id: 1,
                section_name: "One".into(),
                news: vec![
                    make_item("a1", "https://a.com", false),
                    translated,
                    make_item("b1", "https://b.com", true),
                ],
            },
            SectionWithNews {
                section_id: 2,
                section_name: "Two".into(),
                news: vec![make_item("c1", "https://c.com", false)],
            },
        ];
        let (tx, rx) = persist::channel();
        let mut app = App::new(tx, Language::default());
        app.apply_load(LoadMsg::Sections(aggregate(
            &[1, 2],
            fetched,
            &SectionDirectory::default(),
        )));
        (app, rx)
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_is_loading() {
        let (tx, _rx) = persist::channel();
        let app = App::new(tx, Language::default());
        assert_eq!(app.view, View::Loading);
        assert!(app.rows().is_empty());
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn load_messages_set_view() {
        let (tx, _rx) = persist::channel();
        let mut app = App::new(tx, Language::default());

        app.apply_load(LoadMsg::NoSectionsSelected);
        assert_eq!(app.view, View::Message(NO_SECTIONS_MESSAGE.into()));

        app.apply_load(LoadMsg::Error("Failed to load news.".into()));
        assert_eq!(app.view, View::Message("Failed to load news.".into()));
        assert!(app.feed.is_none());
    }

    // -- rows & navigation ---------------------------------------------------

    #[test]
    fn collapsed_feed_shows_sections_and_groups() {
        let (app, _rx) = loaded_app();
        let rows = app.rows();
        assert_eq!(
            rows,
            [
                Row::Section(0),
                Row::Group(GroupPath::new(0, 0)),
                Row::Group(GroupPath::new(0, 1)),
                Row::Section(1),
                Row::Group(GroupPath::new(1, 0)),
            ]
        );
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn navigation_clamps() {
        let (mut app, _rx) = loaded_app();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_last();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(4));
    }

    #[test]
    fn activate_group_then_item() {
        let (mut app, mut rx) = loaded_app();
        app.select_next(); // group a.com
        app.activate();

        let rows = app.rows();
        assert_eq!(rows.len(), 7, "a.com expanded with two items");
        assert_eq!(rows[2], Row::Item(GroupPath::new(0, 0), "a1".into()));

        app.select_next();
        app.activate(); // open a1
        app.activate(); // close a1 -> read
        assert_eq!(rx.try_recv().unwrap(), Command::MarkRead("a1".into()));
        // a1 moved behind a2 (unread first), the cursor follows it.
        assert_eq!(
            app.selected_row(),
            Some(Row::Item(GroupPath::new(0, 0), "a1".into()))
        );
        assert_eq!(app.list_state.selected(), Some(3));
    }

    #[test]
    fn open_selected_records_link() {
        let (mut app, mut rx) = loaded_app();
        app.select_next();
        app.activate();
        app.select_next();
        app.open_selected();

        assert_eq!(app.pending_link.as_deref(), Some("https://example.com/a1"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Command::MarkReadThenLinkClicked("a1".into())
        );
    }

    #[test]
    fn search_hides_groups_without_matches() {
        let (mut app, _rx) = loaded_app();
        for c in "title c1".chars() {
            app.push_search(c);
        }
        assert_eq!(app.rows(), [Row::Section(0), Row::Section(1), Row::Group(GroupPath::new(1, 0))]);

        app.cancel_search();
        assert_eq!(app.rows().len(), 5);
    }

    #[test]
    fn move_section_follows_cursor() {
        let (mut app, _rx) = loaded_app();
        app.move_section(1);
        assert_eq!(app.feed.as_ref().unwrap().sections()[0].name, "Two");
        assert_eq!(app.selected_row(), Some(Row::Section(1)));
        app.move_section(1); // already last
        assert_eq!(app.feed.as_ref().unwrap().sections()[1].name, "One");
    }

    #[test]
    fn cycle_language_uses_available_translations() {
        let (mut app, _rx) = loaded_app();
        app.cycle_language();
        assert_eq!(app.language.code(), "DE");
        app.cycle_language();
        assert_eq!(app.language.code(), "EN");
    }
}
