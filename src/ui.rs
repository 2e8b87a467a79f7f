//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: search line, the accordion, and a
//!   one-line status bar.
//! * Rows come from [`App::rows`]; this module only decides how each row
//!   looks.  Read items are dimmed, the open item shows its summary.
//! * Titles and summaries go through the item's translation lookup, search
//!   counts come from [`crate::feed::filter`].

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Row, View};
use crate::feed::{filter, Accordion};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [search_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search_bar(app, frame, search_area);
    match app.view.clone() {
        View::Loading => draw_message(frame, main_area, "Loading news…"),
        View::Message(msg) => draw_message(frame, main_area, &msg),
        View::Feed => draw_feed(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let style = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if app.searching { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled(" / ", style),
        Span::styled(format!("{}{cursor}", app.search), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_message(frame: &mut Frame, area: Rect, msg: &str) {
    let p = Paragraph::new(msg.to_string())
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" News ").borders(Borders::ALL));
    frame.render_widget(p, area);
}

/// Render the accordion.
fn draw_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let rows = app.rows();
    let Some(feed) = &app.feed else {
        return;
    };
    let items: Vec<ListItem> = rows.iter().map(|row| render_row(app, feed, row)).collect();

    let list = List::new(items)
        .block(Block::default().title(" News ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_row(app: &App, feed: &Accordion, row: &Row) -> ListItem<'static> {
    match row {
        Row::Section(si) => {
            let name = feed
                .sections()
                .get(*si)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            ListItem::new(Line::from(Span::styled(
                name,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
        }
        Row::Group(path) => {
            let Some(group) = feed.group(*path) else {
                return ListItem::new("");
            };
            let marker = if group.is_open { "▾" } else { "▸" };
            let count = filter(group, &app.search).match_count;
            ListItem::new(Line::from(vec![
                Span::raw(format!("  {marker} ")),
                Span::styled(group.key.clone(), Style::default().fg(Color::White)),
                Span::styled(format!("  ({count})"), Style::default().fg(Color::Green)),
            ]))
        }
        Row::Item(path, id) => {
            let Some(group) = feed.group(*path) else {
                return ListItem::new("");
            };
            let Some(item) = group.find(id) else {
                return ListItem::new("");
            };
            let (bullet, style) = if item.is_read {
                ("○", Style::default().fg(Color::DarkGray))
            } else {
                ("●", Style::default().fg(Color::White))
            };
            let date = item.published_at.format("%Y-%m-%d %H:%M").to_string();
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("      {bullet} "), style),
                Span::styled(format!("{date:<17}"), Style::default().fg(Color::DarkGray)),
                Span::styled(item.display_title(&app.language).to_string(), style),
            ])];
            if item.is_new && !item.is_read {
                lines[0].push_span(Span::styled(" NEW", Style::default().fg(Color::Magenta)));
            }

            if group.open_item_id.as_deref() == Some(id.as_str()) {
                lines.push(Line::from(Span::raw(format!(
                    "        {}",
                    item.display_summary(&app.language)
                ))));
                lines.push(Line::from(Span::styled(
                    format!("        {}", item.link),
                    Style::default().fg(Color::Blue),
                )));
            }
            ListItem::new(Text::from(lines))
        }
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let unread = app.feed.as_ref().map_or(0, Accordion::unread_total);
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(format!("{unread} unread"), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", app.language.code()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  q: quit  enter: expand  o: open  /: search  l: language  r: reload"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{aggregate, SectionDirectory};
    use crate::load::LoadMsg;
    use crate::persist;
    use crate::source::{make_item, Language, SectionWithNews};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn app_with_feed() -> App {
        let (tx, _rx) = persist::channel();
        let mut app = App::new(tx, Language::default());
        let fetched = vec![SectionWithNews {
            section_id: 1,
            section_name: "World".into(),
            news: vec![
                make_item("1", "https://www.a.com", false),
                make_item("2", "https://a.com", true),
            ],
        }];
        app.apply_load(LoadMsg::Sections(aggregate(
            &[1, 2],
            fetched,
            &SectionDirectory::default(),
        )));
        app
    }

    #[test]
    fn draw_does_not_panic_while_loading() {
        let (tx, _rx) = persist::channel();
        let mut app = App::new(tx, Language::default());
        assert!(screen_text(&mut app).contains("Loading news"));
    }

    #[test]
    fn draw_shows_sections_and_groups() {
        let mut app = app_with_feed();
        let text = screen_text(&mut app);
        assert!(text.contains("World"));
        assert!(text.contains("a.com"));
        assert!(text.contains("Unknown Section"));
        assert!(text.contains("1 unread"), "status bar should show unread count");
    }

    #[test]
    fn draw_open_item_shows_summary() {
        let mut app = app_with_feed();
        app.select_next();
        app.activate();
        app.select_next();
        app.activate();
        let text = screen_text(&mut app);
        assert!(text.contains("Summary 1"));
    }

    #[test]
    fn draw_message_view() {
        let mut app = app_with_feed();
        app.apply_load(LoadMsg::NoSectionsSelected);
        assert!(screen_text(&mut app).contains("No sections selected"));
    }
}
