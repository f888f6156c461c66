// --- File: crates/imagify_config/src/lib.rs ---
pub mod env_vars;
pub mod models;

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use models::*;

/// Loads the application configuration from `config/default.toml`,
/// `config/{RUN_ENV}.toml` and the environment.
///
/// The config directory is taken from `IMAGIFY_CONFIG_DIR` and defaults to
/// `./config`. Both files are optional.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("IMAGIFY_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    load_config_from(&config_dir, &run_env)
}

/// Same as [`load_config`] with an explicit directory and run environment.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigError> {
    let prefix = env_vars::get_config_prefix();
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!(
        "Loading config: default={}, env={}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator(env_vars::CONFIG_SEPARATOR)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );
    let builder = env_vars::apply_legacy_env_overrides(builder, &prefix)?;

    let config: AppConfig = builder.build()?.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

/// Work factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Checks the settings the services cannot run without.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.jwt_secret.trim().is_empty() {
        return Err(ConfigError::Message(
            "auth.jwt_secret must be set (IMAGIFY__AUTH__JWT_SECRET or JWT_SECRET)".to_string(),
        ));
    }

    if !BCRYPT_COST_RANGE.contains(&config.auth.bcrypt_cost) {
        return Err(ConfigError::Message(format!(
            "auth.bcrypt_cost must be between {} and {}, got {}",
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end(),
            config.auth.bcrypt_cost
        )));
    }

    if config.use_razorpay {
        let razorpay = config.razorpay.as_ref().ok_or_else(|| {
            ConfigError::Message("use_razorpay is set but the razorpay section is missing".to_string())
        })?;
        if razorpay.key_id.trim().is_empty() || razorpay.key_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "razorpay.key_id and razorpay.key_secret must be set when use_razorpay is enabled"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from a first command line
/// argument starting with `.env`, and defaults to `.env`. A missing file is
/// not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn valid_config() -> AppConfig {
        AppConfig {
            auth: AuthConfig {
                jwt_secret: "secret".to_string(),
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.auth.token_ttl_secs, 2_592_000);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(!config.use_razorpay);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_validate_requires_jwt_secret() {
        assert!(validate(&AppConfig::default()).is_err());
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bcrypt_cost_out_of_range() {
        let mut config = valid_config();
        for cost in [0, 3, 32] {
            config.auth.bcrypt_cost = cost;
            assert!(validate(&config).is_err(), "cost {} accepted", cost);
        }
        for cost in [4, 10, 31] {
            config.auth.bcrypt_cost = cost;
            assert!(validate(&config).is_ok(), "cost {} rejected", cost);
        }
    }

    #[test]
    fn test_validate_requires_razorpay_keys_when_enabled() {
        let mut config = valid_config();
        config.use_razorpay = true;
        assert!(validate(&config).is_err());

        config.razorpay = Some(RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: String::new(),
            currency: "INR".to_string(),
            api_base_url: "https://api.razorpay.com/v1".to_string(),
        });
        assert!(validate(&config).is_err());

        if let Some(razorpay) = config.razorpay.as_mut() {
            razorpay.key_secret = "rzp_secret".to_string();
        }
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_load_config_from_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("default.toml"),
            r#"
use_razorpay = true

[server]
host = "0.0.0.0"
port = 8080

[auth]
jwt_secret = "file-secret"
token_ttl_secs = 60

[razorpay]
key_id = "rzp_test_key"
key_secret = "rzp_test_secret"
"#,
        )
        .expect("write default.toml");
        fs::write(
            dir.path().join("test.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9090
"#,
        )
        .expect("write test.toml");

        let config = load_config_from(dir.path(), "test").expect("config loads");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.auth.token_ttl_secs, 60);
        let razorpay = config.razorpay.expect("razorpay section");
        assert_eq!(razorpay.currency, "INR");
        assert_eq!(razorpay.api_base_url, "https://api.razorpay.com/v1");
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let mut config = valid_config();
        config.auth.jwt_secret = "do-not-print-me".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("do-not-print-me"));
        assert!(rendered.contains("<redacted>"));
    }
}
