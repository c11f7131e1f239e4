//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter (e.g. `"info"`)
///
/// `RUST_LOG` still takes precedence when set. Calling this more than once
/// is harmless; later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Initialize the logging system with the configured default filter
pub fn init_from_config(config: &crate::config::TextEngineConfig) {
    init_with_filter(&config.log_filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextEngineConfig;
    
    #[test]
    fn test_init_from_config_is_repeatable() {
        let config = TextEngineConfig::default();
        
        init_from_config(&config);
        init_from_config(&config);
        log::info!("logging initialized with filter '{}'", config.log_filter);
    }
}
