//! Toast stack renderer.
//!
//! Toasts are drawn over the top-right corner, newest at the bottom.

use crate::ui::helpers::{char_width, clip, pad_right, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToastInfo;

const TOAST_MAX_WIDTH: usize = 48;

pub fn render_toasts(row: usize, toasts: &[ToastInfo], theme: &Theme, cols: usize) {
    let width = TOAST_MAX_WIDTH.min(cols.saturating_sub(4));
    if width < 12 {
        return;
    }
    let col = cols.saturating_sub(width + 1) + 1;
    let mut current_row = row;

    for toast in toasts {
        let accent = Theme::fg(theme.colors.toast_fg(toast.kind));
        let background = Theme::bg(&theme.colors.toast_bg);
        let heading = format!(" {} {}", toast.kind.icon(), toast.title);

        position_cursor(current_row, col);
        print!("{background}{}{accent}{}", Theme::bold(), pad_right(&heading, width));
        print!("{}", Theme::reset());
        current_row += 1;

        if let Some(message) = &toast.message {
            let mut body = format!("   {message}");
            if char_width(&body) > width {
                body = format!("{}…", clip(&body, width - 1));
            }
            position_cursor(current_row, col);
            print!("{background}{}", Theme::fg(&theme.colors.text_normal));
            print!("{}", pad_right(&body, width));
            print!("{}", Theme::reset());
            current_row += 1;
        }
    }
}
