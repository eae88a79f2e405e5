//! Empty state renderer.

use crate::ui::helpers::{char_width, clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the message and subtitle centered, starting at `row`.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    let message = clip(&empty.message, cols);
    let message_padding = cols.saturating_sub(char_width(&message)) / 2;
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}{message}", " ".repeat(message_padding));
    print!("{}", Theme::reset());

    if empty.subtitle.is_empty() {
        return;
    }
    let subtitle = clip(&empty.subtitle, cols);
    let subtitle_padding = cols.saturating_sub(char_width(&subtitle)) / 2;
    position_cursor(row + 1, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}{subtitle}", " ".repeat(subtitle_padding));
    print!("{}", Theme::reset());
}
