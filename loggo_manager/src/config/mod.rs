//! Runtime configuration for the loggo host
//!
//! Each setting is layered, see [`resolve_runtime_value`]:
//! - `LOGGO_PLUGIN_DIR`: directory scanned for plugins instead of the
//!   directory holding the `loggo` executable
//! - `LOGGO_LOG`: tracing filter directive (default `warn`)
//!
//! Packagers can bake in their own values by setting
//! `LOGGO_PACKAGED_PLUGIN_DIR` / `LOGGO_PACKAGED_LOG` at build time.

use std::ffi::OsString;
use std::path::PathBuf;

pub const PLUGIN_DIR_ENV: &str = "LOGGO_PLUGIN_DIR";
pub const LOG_ENV: &str = "LOGGO_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Values fixed when the binary was built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PackagedDefaults {
    plugin_dir: Option<&'static str>,
    log_filter: Option<&'static str>,
}

impl PackagedDefaults {
    fn from_build() -> Self {
        Self {
            plugin_dir: option_env!("LOGGO_PACKAGED_PLUGIN_DIR").filter(|v| !v.is_empty()),
            log_filter: option_env!("LOGGO_PACKAGED_LOG").filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Replaces the executable's directory when set
    pub plugin_dir: Option<PathBuf>,
    /// Filter handed to the tracing subscriber
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            plugin_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HostConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        Self::layered(lookup, PackagedDefaults::from_build())
    }

    fn layered<F>(lookup: F, packaged: PackagedDefaults) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            plugin_dir: resolve_runtime_value(
                var(PLUGIN_DIR_ENV).map(|dir| Some(PathBuf::from(dir))),
                packaged.plugin_dir.map(|dir| Some(PathBuf::from(dir))),
                defaults.plugin_dir,
            ),
            log_filter: resolve_runtime_value(
                var(LOG_ENV).and_then(|value| value.into_string().ok()),
                packaged.log_filter.map(str::to_string),
                defaults.log_filter,
            ),
        }
    }
}

/// Configuration precedence for runtime values
/// 1. Environment variables (highest)
/// 2. Values baked in at build time
/// 3. Built-in defaults (lowest)
pub fn resolve_runtime_value<T>(env_var: Option<T>, packaged: Option<T>, default: T) -> T {
    env_var.or(packaged).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_precedence() {
        // environment > packaged > default
        assert_eq!(resolve_runtime_value(Some(1), Some(2), 3), 1);
        assert_eq!(resolve_runtime_value(None, Some(2), 3), 2);
        assert_eq!(resolve_runtime_value::<i32>(None, None, 3), 3);
    }

    #[test]
    fn test_packaged_values_sit_between_environment_and_defaults() {
        let packaged = PackagedDefaults {
            plugin_dir: Some("/usr/lib/loggo"),
            log_filter: Some("info"),
        };

        let config = HostConfig::layered(lookup_in(&[]), packaged);
        assert_eq!(config.plugin_dir, Some(PathBuf::from("/usr/lib/loggo")));
        assert_eq!(config.log_filter, "info");

        let config = HostConfig::layered(lookup_in(&[(LOG_ENV, "debug")]), packaged);
        assert_eq!(config.plugin_dir, Some(PathBuf::from("/usr/lib/loggo")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = HostConfig::layered(lookup_in(&[]), PackagedDefaults::default());
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = HostConfig::from_lookup(lookup_in(&[
            (PLUGIN_DIR_ENV, "/opt/loggo/plugins"),
            (LOG_ENV, "loggo_manager=debug"),
        ]));
        assert_eq!(config.plugin_dir, Some(PathBuf::from("/opt/loggo/plugins")));
        assert_eq!(config.log_filter, "loggo_manager=debug");
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = HostConfig::layered(
            lookup_in(&[(PLUGIN_DIR_ENV, ""), (LOG_ENV, "")]),
            PackagedDefaults::default(),
        );
        assert_eq!(config, HostConfig::default());
    }
}
