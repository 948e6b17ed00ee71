//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

use grove_core::component::banner::Kind;

// ── Palette ───────────────────────────────────────────────────────────

pub const LEAF: Color = Color::Rgb(126, 217, 87); // #7ed957
pub const SKY: Color = Color::Rgb(125, 207, 255); // #7dcfff
pub const SUN: Color = Color::Rgb(245, 208, 97); // #f5d061
pub const BLOSSOM: Color = Color::Rgb(247, 118, 142); // #f7768e
pub const BARK: Color = Color::Rgb(86, 95, 137); // #565f89
pub const MIST: Color = Color::Rgb(192, 202, 245); // #c0caf5
pub const SOIL: Color = Color::Rgb(26, 27, 38); // #1a1b26
pub const SHADE: Color = Color::Rgb(41, 46, 66); // #292e42

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(LEAF).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(LEAF)
}

pub fn border_default() -> Style {
    Style::default().fg(BARK)
}

/// Large sensor value.
pub fn reading() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

/// Set point next to a reading.
pub fn set_point() -> Style {
    Style::default().fg(SUN)
}

pub fn muted() -> Style {
    Style::default().fg(BARK)
}

pub fn text() -> Style {
    Style::default().fg(MIST)
}

pub fn list_selected() -> Style {
    Style::default()
        .fg(LEAF)
        .bg(SHADE)
        .add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(BLOSSOM)
}

/// Key hint text (e.g., "q quit  r recipes").
pub fn key_hint() -> Style {
    Style::default().fg(BARK)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

/// Banner colour and icon per alert kind.
pub fn alert(kind: Kind) -> (Color, &'static str) {
    match kind {
        Kind::Info => (LEAF, "✓"),
        Kind::Dismissable => (SUN, "!"),
        Kind::Refreshable => (BLOSSOM, "✗"),
    }
}
