//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with favorite counts
//! - [`footer`]: Keybinding hints
//! - [`search`]: Query box with filter tabs and status
//! - [`table`]: Results table (★, TITLE, TYPE, YEAR, RATING)
//! - [`details`]: Details panel above the footer
//! - [`toasts`]: Notification stack over the top-right corner
//! - [`empty`]: Message shown in place of an empty table
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Query box - 3 lines]
//! [Table Headers]
//! [Table Rows or Empty State]
//! [Details panel - 10 lines, when open]
//! [Border]
//! [Footer]
//! ```

mod details;
mod empty;
mod footer;
mod header;
mod search;
mod table;
mod toasts;

pub use details::DETAILS_PANEL_HEIGHT;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use details::render_details;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};
use toasts::render_toasts;

/// Renders a horizontal border line. Returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full screen for a view model.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let header_row = 2;

    let mut current_row = render_header(header_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_table_headers(current_row, theme, cols);

    match &vm.empty_state {
        Some(empty) => render_empty_state(current_row + 2, empty, theme, cols),
        None => {
            render_table_rows(current_row, &vm.display_items, theme, cols);
        }
    }

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    if let Some(details) = &vm.details {
        let details_row = border_row.saturating_sub(DETAILS_PANEL_HEIGHT);
        if details_row > current_row {
            render_details(details_row, details, theme, cols);
        }
    }

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);

    render_toasts(header_row, &vm.toasts, theme, cols);
}
