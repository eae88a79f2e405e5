//! Query box renderer.
//!
//! ```text
//!      ┌───────────────────────────────────────────────────┐
//!      │ Search: matrix▏  [All] Movies TV Shows   real-time │
//!      └───────────────────────────────────────────────────┘
//! ```

use crate::ui::helpers::{char_width, clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{SearchBarInfo, SearchStatusKind};

/// Horizontal margin for the box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the 3-line query box. Returns the row after it.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}┌{}┐{}", "─".repeat(inner_width), Theme::reset());

    let cursor = if search.is_typing { "▏" } else { "" };
    let query_text = format!(" {}: {}{cursor}", search.label, search.query);
    let tabs: String = search
        .filters
        .iter()
        .map(|(label, active)| if *active { format!("[{label}]") } else { format!(" {label} ") })
        .collect::<Vec<_>>()
        .join(" ");
    let status = format!("{} ", search.status);

    let fixed = char_width(&query_text) + 2 + char_width(&tabs) + 2;
    let status = if fixed + char_width(&status) <= inner_width { status } else { String::new() };
    let tabs = if fixed <= inner_width { tabs } else { String::new() };
    let query_text = clip(&query_text, inner_width);
    let used = char_width(&query_text) + if tabs.is_empty() { 0 } else { 2 + char_width(&tabs) } + char_width(&status);
    let gap = inner_width.saturating_sub(used);

    let status_color = match search.status_kind {
        SearchStatusKind::Idle | SearchStatusKind::RealTime => &theme.colors.text_dim,
        SearchStatusKind::Searching => &theme.colors.info_fg,
        SearchStatusKind::Results => &theme.colors.success_fg,
        SearchStatusKind::Error => &theme.colors.error_fg,
    };

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{query_text}");
    if !tabs.is_empty() {
        print!("  {}{}{tabs}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg), Theme::reset());
    }
    print!("{}", " ".repeat(gap));
    print!("{}{status}", Theme::fg(status_color));
    print!("{border}│{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}└{}┘{}", "─".repeat(inner_width), Theme::reset());

    row + 3
}
