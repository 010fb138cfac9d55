use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Per-target settings for the external-system sync engine. A target
/// with endpoint or credential missing is deliberately disabled: its
/// adapter becomes a permanent no-op for the run, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub content: TargetSettings,
    pub erp: TargetSettings,
    pub fleet: TargetSettings,
    pub identity: TargetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl TargetSettings {
    fn disabled(timeout_secs: u64) -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs,
        }
    }

    fn apply_env(&mut self, url_var: &str, key_var: &str) {
        if let Ok(v) = env::var(url_var) {
            self.endpoint = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var(key_var) {
            self.api_key = Some(v).filter(|s| !s.is_empty());
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        if let Ok(v) = env::var("SYNC_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                self.sync.content.timeout_secs = secs;
                self.sync.erp.timeout_secs = secs;
                self.sync.fleet.timeout_secs = secs;
                self.sync.identity.timeout_secs = secs;
            }
        }

        // Target endpoints and credentials come only from the environment
        self.sync.content.apply_env("CONTENT_API_URL", "CONTENT_API_KEY");
        self.sync.erp.apply_env("ERP_API_URL", "ERP_API_KEY");
        self.sync.fleet.apply_env("FLEET_API_URL", "FLEET_API_TOKEN");
        self.sync.identity.apply_env("IDENTITY_API_URL", "IDENTITY_API_KEY");

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                content: TargetSettings::disabled(30),
                erp: TargetSettings::disabled(30),
                fleet: TargetSettings::disabled(30),
                identity: TargetSettings::disabled(30),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            sync: SyncConfig {
                content: TargetSettings::disabled(15),
                erp: TargetSettings::disabled(15),
                fleet: TargetSettings::disabled(15),
                identity: TargetSettings::disabled(15),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            sync: SyncConfig {
                content: TargetSettings::disabled(10),
                erp: TargetSettings::disabled(10),
                fleet: TargetSettings::disabled(10),
                identity: TargetSettings::disabled(10),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.max_connections, 10);
        assert!(config.server.enable_request_logging);
        assert!(!config.sync.content.is_configured());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert!(!config.server.enable_request_logging);
        assert_eq!(config.sync.erp.timeout_secs, 10);
    }

    #[test]
    fn target_needs_both_endpoint_and_credential() {
        let mut settings = TargetSettings::disabled(10);
        assert!(!settings.is_configured());

        settings.endpoint = Some("https://erp.example.com".into());
        assert!(!settings.is_configured());

        settings.api_key = Some("secret".into());
        assert!(settings.is_configured());
    }
}
