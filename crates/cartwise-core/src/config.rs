use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let bind_addr = parse_addr("CARTWISE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CARTWISE_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("CARTWISE_DATA_DIR", "./data"));
    let stores_path = PathBuf::from(or_default("CARTWISE_STORES_PATH", "./config/stores.yaml"));

    let render_timeout_secs = parse_u64("CARTWISE_RENDER_TIMEOUT_SECS", "45")?;
    let user_agent = or_default("CARTWISE_USER_AGENT", "cartwise/0.1 (deal-aggregator)");
    let min_captured_items = parse_usize("CARTWISE_MIN_CAPTURED_ITEMS", "3")?;
    let max_walk_nodes = parse_usize("CARTWISE_MAX_WALK_NODES", "50000")?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        data_dir,
        stores_path,
        render_timeout_secs,
        user_agent,
        min_captured_items,
        max_walk_nodes,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_uses_defaults() {
        let map = HashMap::new();
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir.to_string_lossy(), "./data");
        assert_eq!(config.render_timeout_secs, 45);
        assert_eq!(config.min_captured_items, 3);
        assert_eq!(config.max_walk_nodes, 50_000);
    }

    #[test]
    fn env_values_override_defaults() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_BIND_ADDR", "127.0.0.1:8080");
        map.insert("CARTWISE_DATA_DIR", "/var/lib/cartwise");
        map.insert("CARTWISE_MIN_CAPTURED_ITEMS", "5");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir.to_string_lossy(), "/var/lib/cartwise");
        assert_eq!(config.min_captured_items, 5);
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_BIND_ADDR", "not-an-addr");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { var, .. } if var == "CARTWISE_BIND_ADDR"
        ));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert("CARTWISE_RENDER_TIMEOUT_SECS", "soon");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { var, .. } if var == "CARTWISE_RENDER_TIMEOUT_SECS"
        ));
    }
}
