//! Environment variable handling for the Imagify backend.
//!
//! Configuration keys map to `IMAGIFY__SECTION__KEY` variables. The variable
//! names used by earlier deployments (`JWT_SECRET`, `PORT`, ...) are still
//! honoured, but a prefixed variable for the same key takes precedence.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "IMAGIFY";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Legacy variable name -> configuration path.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("JWT_SECRET", "auth.jwt_secret"),
    ("RAZORPAY_KEY_ID", "razorpay.key_id"),
    ("RAZORPAY_KEY_SECRET", "razorpay.key_secret"),
    ("CURRENCY", "razorpay.currency"),
    ("DATABASE_URL", "database.url"),
    ("PORT", "server.port"),
];

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `prefix` - The variable prefix (usually [`DEFAULT_PREFIX`])
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "IMAGIFY__SERVER__HOST")
pub fn config_path_to_env_var(prefix: &str, path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Collects the legacy overrides that apply, given a variable lookup.
///
/// A legacy variable is skipped when the prefixed variable for the same path
/// is present, and when its value is empty.
pub fn legacy_overrides<F>(prefix: &str, lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_ENV_VARS
        .iter()
        .filter(|(_, path)| lookup(&config_path_to_env_var(prefix, path)).is_none())
        .filter_map(|(name, path)| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*path, value))
        })
        .collect()
}

/// Applies the legacy variable names found in the process environment as
/// overrides on the builder.
pub fn apply_legacy_env_overrides(
    builder: ConfigBuilder<DefaultState>,
    prefix: &str,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    legacy_overrides(prefix, |name| env::var(name).ok())
        .into_iter()
        .try_fold(builder, |builder, (path, value)| {
            builder.set_override(path, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var(DEFAULT_PREFIX, "server.host"),
            "IMAGIFY__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("imagify", "auth.jwt_secret"),
            "IMAGIFY__AUTH__JWT_SECRET"
        );
    }

    #[test]
    fn test_legacy_names_map_to_paths() {
        let overrides = legacy_overrides(
            DEFAULT_PREFIX,
            lookup_from(&[("JWT_SECRET", "s3cret"), ("PORT", "5000")]),
        );
        assert!(overrides.contains(&("auth.jwt_secret", "s3cret".to_string())));
        assert!(overrides.contains(&("server.port", "5000".to_string())));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_prefixed_variable_wins_over_legacy() {
        let overrides = legacy_overrides(
            DEFAULT_PREFIX,
            lookup_from(&[
                ("JWT_SECRET", "legacy"),
                ("IMAGIFY__AUTH__JWT_SECRET", "prefixed"),
                ("CURRENCY", "USD"),
            ]),
        );
        assert_eq!(overrides, vec![("razorpay.currency", "USD".to_string())]);
    }

    #[test]
    fn test_empty_legacy_values_are_ignored() {
        let overrides =
            legacy_overrides(DEFAULT_PREFIX, lookup_from(&[("RAZORPAY_KEY_ID", "  ")]));
        assert!(overrides.is_empty());
    }
}
