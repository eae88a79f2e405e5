//! Path handling for the Zellij plugin sandbox.
//!
//! In the sandbox the host filesystem is mounted under `/host`, which
//! normally resolves to the directory Zellij was started from.

use std::path::PathBuf;

/// File name of the favorites document inside [`get_data_dir`].
pub const STORE_FILE: &str = "marquee.json";

/// Returns the data directory for Marquee storage.
///
/// Resolves to `/host/.local/share/zellij/marquee`, i.e.
/// `~/.local/share/zellij/marquee` when Zellij runs from the home directory.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/marquee");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("marquee")
}

/// Path of the JSON document holding persisted favorites.
#[must_use]
pub fn store_path() -> PathBuf {
    get_data_dir().join(STORE_FILE)
}

/// Expands tilde paths to use the `/host` prefix.
///
/// Used for the `theme_file` configuration option.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
