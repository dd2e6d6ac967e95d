use std::{env, fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use serde::Serialize;
use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    #[default]
    Local,
    Dev,
    Staging,
}

impl AppEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Local => "local",
            AppEnv::Dev => "dev",
            AppEnv::Staging => "staging",
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(AppEnv::Local),
            "dev" => Ok(AppEnv::Dev),
            "staging" => Ok(AppEnv::Staging),
            other => Err(AppError::Config(format!("invalid APP_ENV: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub env: AppEnv,
    pub app_name: String,
    pub auth_api_url: Url,
    pub auth_timeout: Duration,
    pub seed_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            env: AppEnv::Local,
            app_name: "UWMobile".to_string(),
            auth_api_url: Url::parse("http://localhost:5000").expect("static url parses"),
            auth_timeout: Duration::from_secs(10),
            seed_path: PathBuf::from("data/trips.json"),
            snapshot_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("APP_LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?,
            None => defaults.listen_addr,
        };

        let env = match lookup("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => defaults.env,
        };

        let app_name = lookup("APP_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.app_name);

        let auth_api_url = match lookup("AUTH_API_URL") {
            Some(raw) => Url::parse(raw.trim())
                .map_err(|err| AppError::Config(format!("invalid AUTH_API_URL: {err}")))?,
            None => defaults.auth_api_url,
        };

        let auth_timeout = match lookup("AUTH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|err| AppError::Config(format!("invalid AUTH_TIMEOUT_SECS: {err}")))?,
            None => defaults.auth_timeout,
        };

        let seed_path = lookup("TRIPS_SEED_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.seed_path);

        let snapshot_path = lookup("TRIPS_SNAPSHOT_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            env,
            app_name,
            auth_api_url,
            auth_timeout,
            seed_path,
            snapshot_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.env, AppEnv::Local);
        assert_eq!(config.app_name, "UWMobile");
        assert_eq!(config.auth_api_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_LISTEN_ADDR", "0.0.0.0:8080"),
            ("APP_ENV", "Staging"),
            ("AUTH_API_URL", "http://10.0.2.2:5000"),
            ("AUTH_TIMEOUT_SECS", "3"),
            ("TRIPS_SEED_PATH", "/tmp/seed.json"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.env, AppEnv::Staging);
        assert_eq!(config.auth_timeout, Duration::from_secs(3));
        assert_eq!(config.seed_path, PathBuf::from("/tmp/seed.json"));
    }

    #[test]
    fn bad_values_are_config_errors() {
        for (key, value) in [
            ("APP_LISTEN_ADDR", "nowhere"),
            ("APP_ENV", "prod"),
            ("AUTH_API_URL", "not a url"),
            ("AUTH_TIMEOUT_SECS", "soon"),
        ] {
            let result = AppConfig::from_lookup(lookup(&[(key, value)]));
            assert!(matches!(result, Err(AppError::Config(_))), "{key}={value}");
        }
    }
}
