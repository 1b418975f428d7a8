//! Path helpers for configuration, catalog and log file locations.
//!
//! Paths coming from configuration may start with `~`; they are expanded
//! against `$HOME` before use. Relative log file names are placed in the
//! per-user data directory.

use std::env;
use std::path::{Path, PathBuf};

/// Returns the data directory for marketview files.
///
/// Resolves to `$XDG_DATA_HOME/marketview`, falling back to
/// `~/.local/share/marketview`, and to `./marketview` when neither variable is set.
///
/// # Examples
///
/// ```
/// use marketview::infrastructure::data_dir;
///
/// assert!(data_dir().ends_with("marketview"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    data_dir_from(
        env::var_os("XDG_DATA_HOME").map(PathBuf::from).as_deref(),
        home_dir().as_deref(),
    )
}

fn data_dir_from(xdg_data_home: Option<&Path>, home: Option<&Path>) -> PathBuf {
    let base = match (xdg_data_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg.to_path_buf(),
        (_, Some(home)) => home.join(".local").join("share"),
        _ => PathBuf::from("."),
    };
    base.join("marketview")
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when `$HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use marketview::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/srv/catalog.json").to_str(), Some("/srv/catalog.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path == "~" => home.to_path_buf(),
        Some(home) => path
            .strip_prefix("~/")
            .map_or_else(|| PathBuf::from(path), |rest| home.join(rest)),
        None => PathBuf::from(path),
    }
}

/// Resolves a configured log file name.
///
/// Tilde paths are expanded; bare relative names land in [`data_dir`].
#[must_use]
pub fn resolve_log_path(configured: &str) -> PathBuf {
    let expanded = expand_tilde(configured);
    if expanded.is_absolute() {
        expanded
    } else {
        data_dir().join(expanded)
    }
}
