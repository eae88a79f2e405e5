//! Results table renderer.
//!
//! Columns: favorite marker, TITLE, TYPE, YEAR, RATING.

use crate::ui::helpers::{self, char_width, pad_right, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

const MARKER_WIDTH: usize = 2;
const TYPE_WIDTH: usize = 8;
const YEAR_WIDTH: usize = 6;
const RATING_WIDTH: usize = 6;

fn title_width(cols: usize) -> usize {
    cols.saturating_sub(MARKER_WIDTH + TYPE_WIDTH + YEAR_WIDTH + RATING_WIDTH).max(8)
}

pub fn render_table_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(
        "{}{}{}{}{:>width$}",
        " ".repeat(MARKER_WIDTH),
        pad_right("TITLE", title_width(cols)),
        pad_right("TYPE", TYPE_WIDTH),
        pad_right("YEAR", YEAR_WIDTH),
        "RATING",
        width = RATING_WIDTH
    );
    print!("{}", Theme::reset());
    row + 1
}

/// Renders rows starting at `row`. Returns the row after the last one.
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

/// The selection background spans the full width; match highlights are
/// suppressed on the selected row.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let base = if item.is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    position_cursor(row, 1);
    print!("{base}");

    if item.is_favorite {
        if !item.is_selected {
            print!("{}", Theme::fg(&theme.colors.favorite_fg));
        }
        print!("★ ");
        print!("{base}");
    } else {
        print!("{}", " ".repeat(MARKER_WIDTH));
    }

    let width = title_width(cols);
    helpers::render_highlighted_text(&item.title, &item.highlight_ranges, theme, item.is_selected);
    print!("{base}");
    print!("{}", " ".repeat(width.saturating_sub(char_width(&item.title))));

    print!("{}", pad_right(&item.media_label, TYPE_WIDTH));
    print!("{}", pad_right(&item.year, YEAR_WIDTH));
    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.rating_fg));
    }
    print!("{:>width$}", item.rating, width = RATING_WIDTH);

    let line_len = MARKER_WIDTH + width.max(char_width(&item.title)) + TYPE_WIDTH + YEAR_WIDTH + RATING_WIDTH;
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}
