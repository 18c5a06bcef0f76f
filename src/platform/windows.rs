// Windows: roaming AppData for settings and session, local AppData for cache.

use std::env;
use std::path::PathBuf;

fn env_dir(var: &str, fallback: &str) -> PathBuf {
    PathBuf::from(env::var(var).unwrap_or_else(|_| fallback.to_string()))
}

pub fn get_config_dir() -> PathBuf {
    env_dir("APPDATA", "C:\\Users\\Default\\AppData\\Roaming").join("Relaybrowser")
}

pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}

pub fn get_cache_dir() -> PathBuf {
    env_dir("LOCALAPPDATA", "C:\\Users\\Default\\AppData\\Local")
        .join("Relaybrowser")
        .join("cache")
}
