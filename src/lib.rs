//! Marquee: a Zellij plugin for browsing TMDB movies, TV shows and people.
//!
//! Marquee provides:
//! - Debounced real-time search with explicit submit, paging and a local
//!   media type filter
//! - Favorites persisted through a Zellij worker thread, safe to mutate
//!   before the persisted list has been read
//! - A toast notification stack that buffers messages until the UI is ready
//! - A details panel with cast and recommendations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← keys, host events,
//! └─────────────────────────────────────────────────────┘    action execution
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event → Actions
//! │  - Event handling, timers, view model computation   │
//! └─────────────────────────────────────────────────────┘
//!      │              │               │              │
//! ┌──────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐
//! │ search/  │  │ favorites/│  │ notify/    │  │ api/     │
//! │ debounce │  │ store,    │  │ toast bus  │  │ TMDB     │
//! │ staleness│  │ boot merge│  │            │  │ requests │
//! └──────────┘  └───────────┘  └────────────┘  └──────────┘
//!                     │
//! ┌───────────────────────────┐  ┌──────────────────────┐
//! │ storage/ (KeyValueStore)  │──│ worker/ (file I/O)   │
//! └───────────────────────────┘  └──────────────────────┘
//!
//!   domain/ (media types, errors)   infrastructure/ (paths)
//!   ui/ (rendering, themes)         observability/ (OTLP file traces)
//! ```
//!
//! The library never calls the Zellij host API, so every layer runs in
//! native tests. HTTP requests and timers are returned as [`Action`]s and
//! their results come back as [`Event`]s.
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/marquee.wasm" {
//!         api_key "your-tmdb-key-or-read-access-token"
//!         language "en-US"
//!         include_adult "false"
//!         debounce_ms "500"
//!         toast_ms "4000"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use marquee::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for event in [Event::StartTyping, Event::Char('d'), Event::Char('u')] {
//!     let (_render, actions) = handle_event(&mut state, &event)?;
//!     // The plugin shim executes `actions` against the host.
//!     # let _ = actions;
//! }
//! assert_eq!(state.search.raw_query(), "du");
//! # Ok::<(), marquee::MarqueeError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod domain;
pub mod favorites;
pub mod infrastructure;
pub mod notify;
pub mod search;
pub mod storage;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, ViewMode};
pub use domain::{FavoriteItem, MarqueeError, MediaType, Result, SearchError};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::time::Duration;

/// Default search debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default toast lifetime in milliseconds.
pub const DEFAULT_TOAST_MS: u64 = 4000;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TMDB v3 API key, or a v4 read access token (sent as a bearer token).
    pub api_key: Option<String>,

    /// API root. Default: `https://api.themoviedb.org/3`
    pub api_base_url: String,

    /// Response language. Default: `en-US`
    pub language: String,

    pub include_adult: bool,

    /// Idle time before typed text is searched.
    pub debounce_ms: u64,

    /// How long a toast stays on screen.
    pub toast_ms: u64,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme; `~` resolves under `/host`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: api::DEFAULT_BASE_URL.to_string(),
            language: "en-US".to_string(),
            include_adult: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            toast_ms: DEFAULT_TOAST_MS,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses the configuration map Zellij passes at load.
    ///
    /// Unknown keys are ignored. Values that do not parse fall back to their
    /// defaults with a warning; blank strings count as unset.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marquee::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_key".to_string(), "abc123".to_string());
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("toast_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_key.as_deref(), Some("abc123"));
    /// assert_eq!(config.debounce_ms, 250);
    /// assert_eq!(config.toast_ms, 4000);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            api_key: text("api_key"),
            api_base_url: text("api_base_url")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            language: text("language").unwrap_or(defaults.language),
            include_adult: parse_or(config, "include_adult", defaults.include_adult, parse_bool),
            debounce_ms: parse_or(config, "debounce_ms", defaults.debounce_ms, parse_millis),
            toast_ms: parse_or(config, "toast_ms", defaults.toast_ms, parse_millis),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
        }
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    /// Resolves the theme: `theme_file` first, then `theme`, then the default.
    ///
    /// A theme that cannot be loaded is logged and replaced by the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::expand_tilde(theme_file);
            match Theme::from_file(&path) {
                Ok(theme) => return theme,
                Err(e) => tracing::warn!(theme_file = %path, error = %e, "failed to load theme file, using default"),
            }
        } else if let Some(theme_name) = &self.theme_name {
            match Theme::from_name(theme_name) {
                Some(theme) => return theme,
                None => tracing::warn!(theme_name = %theme_name, "unknown theme, using default"),
            }
        }
        Theme::default()
    }
}

fn parse_or<T: Copy>(config: &BTreeMap<String, String>, key: &str, default: T, parse: fn(&str, &str) -> Result<T>) -> T {
    let Some(raw) = config.get(key) else {
        return default;
    };
    parse(key, raw.trim()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default");
        default
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(MarqueeError::Config(format!("{key}: expected a boolean, got {raw:?}"))),
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|e| MarqueeError::Config(format!("{key}: expected milliseconds, got {raw:?} ({e})")))
}

/// Builds the application state for `config`, with its theme resolved.
///
/// Tracing is installed separately by the plugin shim, see
/// [`observability::init_tracing`].
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        has_api_key = config.api_key.is_some(),
        language = %config.language,
        debounce_ms = config.debounce_ms,
        "initializing marquee plugin"
    );

    AppState::new(config, config.theme())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn blank_api_key_is_unset() {
        let config = Config::from_zellij(&map(&[("api_key", "   ")]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn booleans_and_urls_are_normalized() {
        let config = Config::from_zellij(&map(&[
            ("include_adult", "Yes"),
            ("api_base_url", "http://localhost:8080/3/"),
        ]));
        assert!(config.include_adult);
        assert_eq!(config.api_base_url, "http://localhost:8080/3");

        let config = Config::from_zellij(&map(&[("include_adult", "maybe")]));
        assert!(!config.include_adult);
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        assert!(matches!(parse_millis("toast_ms", "-1"), Err(MarqueeError::Config(_))));
        assert_eq!(parse_millis("toast_ms", "1500").unwrap(), 1500);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            ..Config::default()
        };
        assert_eq!(config.theme(), Theme::default());

        let config = Config {
            theme_name: Some("catppuccin-latte".to_string()),
            ..Config::default()
        };
        assert_eq!(config.theme().name, "catppuccin-latte");
    }
}
