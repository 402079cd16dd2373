//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering reads `App` and never
//! mutates anything except the list widget's scroll state.
//!
//! Layout, top to bottom: masthead, section tabs, featured story, article
//! list, status bar.  The reader is drawn as a centred modal over all of it.

use std::time::Instant;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::article::{format_long_date, DisplayArticle};
use crate::source::Category;
use crate::theme;

const MASTHEAD: &str = "T H E   R E T R O   G A Z E T T E";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame, now: Instant) {
    frame.render_widget(Block::default().style(theme::base()), frame.area());

    let [masthead_area, tabs_area, featured_area, list_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_masthead(frame, masthead_area);
    draw_tabs(app, frame, tabs_area);
    draw_featured(app, frame, featured_area, now);
    draw_article_list(app, frame, list_area);
    draw_status_bar(app, frame, status_area);

    if app.reader.is_some() {
        draw_reader(app, frame);
    }
}

fn draw_masthead(frame: &mut Frame, area: Rect) {
    let today = format_long_date(Local::now().date_naive()).to_uppercase();
    let masthead = Paragraph::new(vec![
        Line::from(Span::styled(MASTHEAD, theme::masthead())),
        Line::from(Span::styled(format!("~ {today} ~"), theme::dim())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_type(theme::BORDER)
            .border_style(theme::base()),
    );
    frame.render_widget(masthead, area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles = Category::ALL
        .iter()
        .map(|c| Line::from(c.label().to_uppercase()));
    let tabs = Tabs::new(titles)
        .select(app.category.index())
        .style(theme::dim())
        .highlight_style(theme::highlight())
        .divider(Span::styled("│", theme::dim()));
    frame.render_widget(tabs, area);
}

fn draw_featured(app: &App, frame: &mut Frame, area: Rect, now: Instant) {
    let dots: String = (0..app.rotation.slots())
        .map(|i| if Some(i) == app.rotation.current() { '●' } else { '○' })
        .collect();

    let block = Block::default()
        .title(Span::styled(" ▣ FEATURED ", theme::headline()))
        .title(Line::from(Span::styled(format!(" {dots} "), theme::base())).right_aligned())
        .borders(Borders::ALL)
        .border_type(theme::BORDER)
        .border_style(theme::base());

    let Some(article) = app.featured_article() else {
        let placeholder = if app.loading {
            "Stopping the presses…"
        } else {
            "No stories on the wire."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(placeholder, theme::dim())).block(block),
            area,
        );
        return;
    };

    // Mid-transition the panel is drawn dimmed.
    let (title_style, body_style) = if app.rotation.is_sliding(now) {
        (theme::dim(), theme::dim())
    } else {
        (theme::headline(), theme::base())
    };

    let text = Text::from(vec![
        Line::from(Span::styled(article.title.to_uppercase(), title_style)),
        byline(article, theme::dim()),
        Line::from(""),
        Line::from(Span::styled(article.excerpt.as_str(), body_style)),
    ]);

    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_article_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .articles
        .iter()
        .map(|article| {
            let mark = if app.bookmarks.contains(&article.id) {
                Span::styled(theme::BOOKMARK_MARK, theme::bookmark())
            } else {
                Span::styled(theme::NO_BOOKMARK_MARK, theme::dim())
            };

            let line = Line::from(vec![
                mark,
                Span::raw(" "),
                Span::styled(
                    format!("{:<15}", format!("[{}]", article.category.to_uppercase())),
                    theme::dim(),
                ),
                Span::styled(article.title.as_str(), theme::base()),
                Span::styled(
                    format!("  · {} · {} · {}", article.author, article.date, article.read_time),
                    theme::dim(),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let title = if app.loading {
        format!(" {} · LOADING… ", app.category.label().to_uppercase())
    } else {
        format!(" {} ", app.category.label().to_uppercase())
    };

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(Span::styled(title, theme::headline()))
                .borders(Borders::ALL)
                .border_type(theme::BORDER)
                .border_style(theme::base()),
        )
        .style(theme::base())
        .highlight_style(theme::highlight())
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    if app.is_demo() {
        spans.push(Span::styled(" DEMO CONTENT ", theme::alert()));
    }
    spans.extend([
        Span::raw(" "),
        Span::styled(app.status.as_str(), theme::base()),
        Span::raw("  "),
        if app.bookmarks.is_empty() {
            Span::styled("no bookmarks", theme::dim())
        } else {
            Span::styled(format!("{} saved", app.bookmarks.len()), theme::bookmark())
        },
        Span::styled(
            "  q quit · tab section · ⏎ read · b save · n flip · o open · r reload",
            theme::dim(),
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme::base()), area);
}

fn draw_reader(app: &App, frame: &mut Frame) {
    let (Some(article), Some(reader)) = (app.reader_article(), app.reader) else {
        return;
    };

    let area = centered_rect(80, 80, frame.area());
    // Guard against zero-sized rects during extreme resizes.
    if area.width < 3 || area.height < 3 {
        return;
    }

    frame.render_widget(Clear, area);

    let mark = if app.is_bookmarked(article) {
        Span::styled(format!(" {} SAVED ", theme::BOOKMARK_MARK), theme::bookmark())
    } else {
        Span::raw("")
    };

    let mut lines = vec![
        Line::from(Span::styled(article.title.to_uppercase(), theme::headline())),
        byline(article, theme::dim()),
        Line::from(Span::styled(
            format!("Section: {}", article.category),
            theme::dim(),
        )),
        Line::from(""),
    ];
    lines.extend(
        article
            .body
            .lines()
            .map(|l| Line::from(Span::styled(l, theme::base()))),
    );
    if let Some(image) = &article.image_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("Photo: {image}"), theme::dim())));
    }
    if !article.link.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Source: {}", article.link),
            theme::dim(),
        )));
    }

    let block = Block::default()
        .title(Span::styled(" READER ", theme::headline()))
        .title(Line::from(mark).right_aligned())
        .title_bottom(Line::from(Span::styled(
            " esc close · j/k scroll · b save · o open ",
            theme::dim(),
        )))
        .borders(Borders::ALL)
        .border_type(theme::BORDER)
        .border_style(theme::base())
        .style(theme::base());

    let reader_view = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((reader.scroll, 0))
        .block(block);
    frame.render_widget(reader_view, area);
}

fn byline(article: &DisplayArticle, style: Style) -> Line<'_> {
    Line::from(Span::styled(
        format!("By {} · {} · {}", article.author, article.date, article.read_time),
        style,
    ))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = percent_of(area.width, percent_x);
    let height = percent_of(area.height, percent_y);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// `percent`% of `len`, computed wide so large terminals don't overflow.
fn percent_of(len: u16, percent: u16) -> u16 {
    let scaled = u32::from(len) * u32::from(percent.min(100)) / 100;
    u16::try_from(scaled).unwrap_or(len)
}

// ---------------------------------------------------------------------------
// Tests (smoke tests against an in-memory backend)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{loaded_app, new_app};
    use crate::fallback::fallback_articles;
    use crate::loader::LoadMsg;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f, Instant::now())).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_articles() {
        let mut app = new_app();
        let text = render(&mut app);
        assert!(text.contains("LOADING"));
    }

    #[test]
    fn draw_shows_featured_story_and_list() {
        let mut app = loaded_app(5);
        let text = render(&mut app);
        assert!(text.contains("FEATURED"));
        assert!(text.contains("STORY 0"), "featured headline is upper-cased");
        assert!(text.contains("Story 4"));
    }

    #[test]
    fn draw_marks_bookmarked_articles() {
        let mut app = loaded_app(3);
        app.toggle_bookmark_selected();
        let text = render(&mut app);
        assert!(text.contains(theme::BOOKMARK_MARK));
        assert!(text.contains("1 saved"));
    }

    #[test]
    fn status_bar_says_when_nothing_is_saved() {
        let mut app = loaded_app(3);
        let text = render(&mut app);
        assert!(text.contains("no bookmarks"));
        assert!(!text.contains("0 saved"));
    }

    #[test]
    fn draw_shows_demo_notice_for_fallback() {
        let mut app = new_app();
        let req = app.take_load_request().unwrap();
        app.apply_load(
            LoadMsg {
                seq: req.seq,
                category: req.category,
                articles: fallback_articles(Local::now().date_naive()),
            },
            Instant::now(),
        );

        let text = render(&mut app);
        assert!(text.contains("DEMO CONTENT"));
    }

    #[test]
    fn draw_reader_modal() {
        let mut app = loaded_app(3);
        app.open_reader();
        let text = render(&mut app);
        assert!(text.contains("READER"));
        assert!(text.contains("Body text"));
    }

    #[test]
    fn draw_survives_tiny_terminal() {
        let mut app = loaded_app(3);
        app.open_reader();
        let backend = TestBackend::new(4, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f, Instant::now())).unwrap();
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(80, 80, area);
        assert_eq!(rect, Rect::new(10, 5, 80, 40));
    }

    #[test]
    fn centered_rect_handles_very_wide_area() {
        let rect = centered_rect(80, 80, Rect::new(0, 0, 900, 50));
        assert_eq!(rect, Rect::new(90, 5, 720, 40));
    }

    #[test]
    fn draw_reader_modal_on_very_wide_terminal() {
        let mut app = loaded_app(3);
        app.open_reader();
        let backend = TestBackend::new(900, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f, Instant::now())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect();
        assert!(text.contains("Body text"));
    }
}
