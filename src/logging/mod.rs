//! Tracing setup for the duel core.
//!
//! - Per-module level filters rendered into an `EnvFilter` string
//! - `RUST_LOG` overrides the configured filter when set
//! - Initialisation is idempotent: the first call wins

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("parry_core::combat".to_string(), LogLevel::Info),
                ("parry_core::movement".to_string(), LogLevel::Warn),
                ("parry_core::duel".to_string(), LogLevel::Info),
                ("parry_core::hotreload".to_string(), LogLevel::Info),
            ],
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Verbose preset for stepping through a duel frame by frame
    pub fn verbose() -> Self {
        Self {
            default_level: LogLevel::Debug,
            module_filters: vec![("parry_core".to_string(), LogLevel::Debug)],
            ..Default::default()
        }
    }

    pub fn with_module(mut self, module: impl Into<String>, level: LogLevel) -> Self {
        self.module_filters.push((module.into(), level));
        self
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global fmt subscriber (first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();

        // Another subscriber may already be installed by the host
        let _ = subscriber.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert!(filter.starts_with("info"));
        assert!(filter.contains("parry_core::combat=info"));
        assert!(filter.contains("parry_core::movement=warn"));
    }

    #[test]
    fn test_with_module_appends() {
        let filter = TracingConfig::verbose()
            .with_module("parry_core::movement", LogLevel::Trace)
            .to_env_filter_string();
        assert!(filter.starts_with("debug"));
        assert!(filter.ends_with("parry_core::movement=trace"));
    }

    #[test]
    fn test_config_from_json() {
        let config: TracingConfig =
            serde_json::from_str(r#"{"default_level": "Warn"}"#).unwrap();
        assert_eq!(config.default_level, LogLevel::Warn);
        assert!(!config.module_filters.is_empty(), "unset fields keep defaults");
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing_default();
        init_tracing(&TracingConfig::verbose());
        tracing::info!("still alive");
    }
}
