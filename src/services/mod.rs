// Relaybrowser services
// Stateless helpers and the configuration file.

pub mod settings_engine;
pub mod url_resolver;
