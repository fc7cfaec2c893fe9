//! Runtime configuration read from the process environment.

use std::env;
use std::time::Duration;

use pushkind_common::models::config::CommonServerConfig;

use crate::jobs::RetryPolicy;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DOMAIN: &str = "localhost";
const DEFAULT_SWEEP_SECS: u64 = 3600;
const DEFAULT_NOTIFY_ATTEMPTS: u32 = 5;
const DEFAULT_NOTIFY_BACKOFF: [u64; 4] = [1, 5, 30, 120];

/// Settings needed to start the HTTP server and its background jobs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key used to sign the session cookie shared with the auth service.
    pub secret: Option<String>,
    /// Where unauthenticated users are sent to sign in.
    pub auth_service_url: Option<String>,
    pub domain: String,
    /// Interval between runs of the stay auto-completion job.
    pub completion_sweep: Duration,
    /// Delivery policy for booking notifications.
    pub notification_retry: RetryPolicy,
}

impl ServerConfig {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or_default(&lookup, "PORT", DEFAULT_PORT);
        let sweep_secs = parse_or_default(&lookup, "COMPLETION_SWEEP_SECS", DEFAULT_SWEEP_SECS);
        let max_attempts =
            parse_or_default(&lookup, "NOTIFY_MAX_ATTEMPTS", DEFAULT_NOTIFY_ATTEMPTS);

        let backoff = match lookup("NOTIFY_BACKOFF_SECS") {
            Some(raw) => match parse_backoff(&raw) {
                Some(backoff) => backoff,
                None => {
                    log::warn!("Ignoring invalid NOTIFY_BACKOFF_SECS value `{raw}`");
                    default_backoff()
                }
            },
            None => default_backoff(),
        };

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            auth_service_url: lookup("AUTH_SERVICE_URL").filter(|value| !value.is_empty()),
            domain: lookup("DOMAIN").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            completion_sweep: Duration::from_secs(sweep_secs.max(1)),
            notification_retry: RetryPolicy::new(max_attempts.max(1), backoff),
        }
    }

    /// Settings shared with the other platform services, or `None` until
    /// both the token secret and the auth service location are known.
    pub fn common(&self) -> Option<CommonServerConfig> {
        Some(CommonServerConfig {
            secret: self.secret.clone()?,
            auth_service_url: self.auth_service_url.clone()?,
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid {key} value `{raw}`");
                default
            }
        },
        None => default,
    }
}

fn parse_backoff(raw: &str) -> Option<Vec<Duration>> {
    let delays = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>().ok().map(Duration::from_secs))
        .collect::<Option<Vec<_>>>()?;

    if delays.is_empty() {
        return None;
    }

    Some(delays)
}

fn default_backoff() -> Vec<Duration> {
    DEFAULT_NOTIFY_BACKOFF
        .iter()
        .copied()
        .map(Duration::from_secs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.secret.is_none());
        assert!(config.common().is_none());
        assert_eq!(config.completion_sweep, Duration::from_secs(3600));
        assert_eq!(config.notification_retry.max_attempts, 5);
        assert_eq!(config.notification_retry.backoff.len(), 4);
    }

    #[test]
    fn session_tokens_need_a_secret() {
        let config = config_from(&[("AUTH_SERVICE_URL", "https://auth.example.com")]);

        assert!(config.common().is_none());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "eighty"), ("NOTIFY_BACKOFF_SECS", "1,x")]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.notification_retry.backoff[0], Duration::from_secs(1));
        assert_eq!(config.notification_retry.backoff.len(), 4);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = config_from(&[
            ("DATABASE_URL", "stays.db"),
            ("PORT", "9000"),
            ("SECRET_KEY", "s3cr3t"),
            ("AUTH_SERVICE_URL", "https://auth.example.com"),
            ("COMPLETION_SWEEP_SECS", "60"),
            ("NOTIFY_MAX_ATTEMPTS", "2"),
            ("NOTIFY_BACKOFF_SECS", "3, 9"),
        ]);

        assert_eq!(config.database_url, "stays.db");
        assert_eq!(config.port, 9000);
        assert_eq!(config.secret.as_deref(), Some("s3cr3t"));
        let common = config.common().expect("auth service configured");
        assert_eq!(common.secret, "s3cr3t");
        assert_eq!(common.auth_service_url, "https://auth.example.com");
        assert_eq!(config.completion_sweep, Duration::from_secs(60));
        assert_eq!(config.notification_retry.max_attempts, 2);
        assert_eq!(
            config.notification_retry.backoff,
            vec![Duration::from_secs(3), Duration::from_secs(9)]
        );
    }
}
