//! Header component renderer.

use crate::ui::helpers::{char_width, clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title on the left and the favorite counts on the right.
///
/// The summary is dropped when both do not fit. Returns the next row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = clip(&header.title, cols);
    let title_len = char_width(&title);
    let summary_len = char_width(&header.summary);
    let summary = if title_len + summary_len < cols { header.summary.as_str() } else { "" };
    let gap = cols.saturating_sub(title_len + char_width(summary));

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{title}");
    print!("{}", " ".repeat(gap));
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(&theme.colors.favorite_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{summary}");

    print!("{}", Theme::reset());
    row + 1
}
