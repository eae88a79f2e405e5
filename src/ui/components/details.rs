//! Details panel renderer.

use crate::ui::helpers::{self, char_width, clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailsInfo;

/// Rows taken by the panel: a title rule plus the body.
pub const DETAILS_PANEL_HEIGHT: usize = 10;

/// Renders the panel in the `DETAILS_PANEL_HEIGHT` rows starting at `row`.
///
/// Body lines are word-wrapped; overflow is cut with an ellipsis line.
pub fn render_details(row: usize, details: &DetailsInfo, theme: &Theme, cols: usize) -> usize {
    let title = clip(&format!("─ {} ", details.title), cols);
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.border));
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{title}");
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(&theme.colors.border));
    print!("{}", "─".repeat(cols.saturating_sub(char_width(&title))));
    print!("{}", Theme::reset());

    let body_rows = DETAILS_PANEL_HEIGHT - 1;
    let width = cols.saturating_sub(2);
    let mut lines: Vec<String> = details.lines.iter().flat_map(|line| helpers::wrap(line, width)).collect();
    if lines.len() > body_rows {
        lines.truncate(body_rows - 1);
        lines.push("…".to_string());
    }

    for (offset, line) in lines.iter().enumerate() {
        position_cursor(row + 1 + offset, 1);
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!(" {line}");
        print!("{}", Theme::reset());
    }

    row + DETAILS_PANEL_HEIGHT
}
