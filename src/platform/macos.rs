// macOS: everything persistent lives under Application Support.

use std::env;
use std::path::PathBuf;

fn library_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp"))).join("Library")
}

pub fn get_config_dir() -> PathBuf {
    library_dir().join("Application Support").join("Relaybrowser")
}

pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}

pub fn get_cache_dir() -> PathBuf {
    library_dir().join("Caches").join("Relaybrowser")
}
