//! The retro palette: amber phosphor on black, with a green accent for
//! bookmarks and a red accent for the demo-content notice.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub const AMBER: Color = Color::Rgb(255, 176, 0);
pub const AMBER_DIM: Color = Color::Rgb(153, 106, 0);
pub const PAPER: Color = Color::Rgb(12, 10, 6);
pub const PHOSPHOR_GREEN: Color = Color::Rgb(51, 255, 102);
pub const ALERT_RED: Color = Color::Rgb(255, 85, 85);

pub const BORDER: BorderType = BorderType::Double;

pub const BOOKMARK_MARK: &str = "★";
pub const NO_BOOKMARK_MARK: &str = "☆";

pub fn base() -> Style {
    Style::default().fg(AMBER).bg(PAPER)
}

pub fn dim() -> Style {
    Style::default().fg(AMBER_DIM).bg(PAPER)
}

pub fn headline() -> Style {
    base().add_modifier(Modifier::BOLD)
}

pub fn masthead() -> Style {
    base().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn highlight() -> Style {
    Style::default()
        .fg(PAPER)
        .bg(AMBER)
        .add_modifier(Modifier::BOLD)
}

pub fn bookmark() -> Style {
    Style::default().fg(PHOSPHOR_GREEN).bg(PAPER)
}

pub fn alert() -> Style {
    Style::default()
        .fg(ALERT_RED)
        .bg(PAPER)
        .add_modifier(Modifier::BOLD)
}
