//! Command handlers for the helpdesk CLI.

pub mod ask;
pub mod search;

pub use ask::AskCommand;
pub use search::SearchCommand;

use helpdesk_core::AppConfig;
use std::path::{Path, PathBuf};

/// Resolve a path given on the command line against the current directory.
pub(crate) fn resolve_cli_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Apply a per-command `--data-dir` on top of the loaded config.
///
/// Unlike `data.dir` in the config file, a relative flag value is taken
/// from the current directory, the same as `--file`.
pub(crate) fn with_data_dir(config: &AppConfig, data_dir: Option<&PathBuf>) -> AppConfig {
    let mut config = config.clone();
    if let Some(dir) = data_dir {
        config.data.dir = Some(resolve_cli_path(dir));
    }
    config
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 80), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("パスワード再設定", 5), "パスワード...");
        assert_eq!(truncate("two\nlines", 80), "two lines");
    }

    #[test]
    fn test_with_data_dir_overrides() {
        let config = AppConfig::default();
        let dir = PathBuf::from("/srv/data");
        assert_eq!(with_data_dir(&config, Some(&dir)).data_dir(), dir);
        assert_eq!(with_data_dir(&config, None).data_dir(), config.data_dir());
    }

    #[test]
    fn test_relative_flags_resolve_against_current_dir() {
        let config = AppConfig {
            workspace: PathBuf::from("/srv/helpdesk"),
            ..AppConfig::default()
        };
        let cwd = std::env::current_dir().unwrap();

        let data_dir = with_data_dir(&config, Some(&PathBuf::from("fixtures"))).data_dir();
        assert_eq!(data_dir, cwd.join("fixtures"));
        assert_eq!(resolve_cli_path(Path::new("question.txt")), cwd.join("question.txt"));
    }
}
