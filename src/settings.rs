use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::FlashError;
use crate::session::{COOKIE_NAME, DEFAULT_SWEEP_INTERVAL_SECONDS, DEFAULT_TTL_SECONDS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlashSettings {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub cookies: CookieSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Upper bound for `ttl_seconds`; stored submissions are meant to live for
/// one redirect, not a browsing session
pub const MAX_TTL_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long a stored submission stays retrievable, also the cookie max-age
    pub ttl_seconds: u64,
    /// Period of the background sweep of expired submissions
    pub sweep_interval_seconds: u64,
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            cookie_name: COOKIE_NAME.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionSettings {
    /// Check values that would make the cache unusable
    ///
    /// # Errors
    ///
    /// Returns an error for a zero TTL or sweep interval, a TTL above
    /// [`MAX_TTL_SECONDS`], or a cookie name that is empty or not a valid token.
    pub fn validate(&self) -> Result<(), FlashError> {
        if self.ttl_seconds == 0 {
            return Err(FlashError::Settings("ttl_seconds must be positive".to_string()));
        }
        if self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(FlashError::Settings(format!(
                "ttl_seconds must not exceed {MAX_TTL_SECONDS}"
            )));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(FlashError::Settings(
                "sweep_interval_seconds must be positive".to_string(),
            ));
        }
        let name_ok = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !name_ok {
            return Err(FlashError::Settings(format!(
                "invalid cookie_name '{}'",
                self.cookie_name
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        let seconds = self.ttl_seconds.min(MAX_TTL_SECONDS);
        chrono::Duration::seconds(i64::try_from(seconds).unwrap_or(0))
    }

    #[must_use]
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl FlashSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - The resulting session settings are invalid
    pub fn load() -> Result<Self, FlashError> {
        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        Self::initialize_logging(&settings);
        settings.session.validate()?;

        Ok(settings)
    }

    /// Initialize the logger, falling back to the configured level when
    /// `RUST_LOG` is not set
    fn initialize_logging(settings: &Self) {
        let env = env_logger::Env::default().default_filter_or(settings.logging.level.as_str());
        if env_logger::Builder::from_env(env).try_init().is_err() {
            log::debug!("Logger already initialized");
        }
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `FLASHFORM_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, FlashError> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(config_dir) = std::env::var("FLASHFORM_CONFIG_DIR") {
            let config_path = std::path::Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                println!("✓ Overriding settings from {}", config_path.display());
            } else {
                println!(
                    "ℹ FLASHFORM_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &std::path::Path) -> Result<Self, FlashError> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        Self::apply_numeric_env_override("SESSION_TTL_SECONDS", &mut session_settings.ttl_seconds);
        Self::apply_numeric_env_override(
            "SWEEP_INTERVAL_SECONDS",
            &mut session_settings.sweep_interval_seconds,
        );
        if let Ok(name) = std::env::var("SESSION_COOKIE_NAME") {
            if !name.is_empty() {
                session_settings.cookie_name = name;
            }
        }
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
