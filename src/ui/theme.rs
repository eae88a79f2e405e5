//! Color schemes and ANSI escape sequence generation.
//!
//! Built-in themes are the Catppuccin flavors, compiled into the plugin.
//! Custom themes are TOML files with the same shape.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark, the default
//! - `catppuccin-latte`: light
//! - `catppuccin-frappe`
//! - `catppuccin-macchiato`
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#f5c2e7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! favorite_fg = "#f9e2af"
//! rating_fg = "#fab387"
//! toast_bg = "#313244"
//! success_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! info_fg = "#89b4fa"
//! warning_fg = "#fab387"
//! ```
//!
//! # Example
//!
//! ```rust
//! use marquee::ui::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! let header = format!("{}Marquee{}", Theme::fg(&theme.colors.header_fg), Theme::reset());
//! assert!(header.starts_with("\u{1b}[38;2;"));
//! ```

use crate::domain::error::{MarqueeError, Result};
use crate::notify::NotificationKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// A named color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, column headers and secondary info.
    pub text_dim: String,

    /// Borders and separator lines.
    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// The ★ marker of favorite rows.
    pub favorite_fg: String,
    pub rating_fg: String,

    /// Toast background; toast kinds tint the icon and title.
    pub toast_bg: String,
    pub success_fg: String,
    pub error_fg: String,
    pub info_fg: String,
    pub warning_fg: String,
}

impl ThemeColors {
    /// Accent color of a toast kind.
    #[must_use]
    pub fn toast_fg(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::Success => &self.success_fg,
            NotificationKind::Error => &self.error_fg,
            NotificationKind::Info => &self.info_fg,
            NotificationKind::Warning => &self.warning_fg,
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name, `None` for unknown names.
    ///
    /// ```rust
    /// use marquee::ui::Theme;
    ///
    /// assert_eq!(Theme::from_name("catppuccin-latte").unwrap().name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::error!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Theme`] if the file cannot be read or is not a
    /// complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| MarqueeError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| MarqueeError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// 24-bit foreground escape for a hex color. Invalid colors render white.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears every attribute.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Plain palette used if the compiled-in default cannot be parsed.
    fn fallback() -> Self {
        let color = |hex: &str| hex.to_string();
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                header_fg: color("#f5c2e7"),
                header_bg: None,
                selection_fg: color("#1e1e2e"),
                selection_bg: color("#f5c2e7"),
                text_normal: color("#cdd6f4"),
                text_dim: color("#6c7086"),
                border: color("#45475a"),
                search_bar_border: color("#f5c2e7"),
                match_highlight_fg: color("#1e1e2e"),
                match_highlight_bg: color("#f9e2af"),
                empty_state_fg: color("#89b4fa"),
                favorite_fg: color("#f9e2af"),
                rating_fg: color("#fab387"),
                toast_bg: color("#313244"),
                success_fg: color("#a6e3a1"),
                error_fg: color("#f38ba8"),
                info_fg: color("#89b4fa"),
                warning_fg: color("#fab387"),
            },
        }
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}
