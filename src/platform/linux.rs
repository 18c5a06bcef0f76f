// Linux: follows the XDG base directory layout.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "relaybrowser";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `$var/relaybrowser` when the variable is set and non-empty, else `~/<fallback>/relaybrowser`.
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

pub fn get_cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", &[".cache"])
}
