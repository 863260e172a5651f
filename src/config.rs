use reqwest::Url;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SCHEDULE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid external service url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("timeout must be greater than zero: {0}")]
    ZeroTimeout(&'static str),
}

/// Configuration du proxy, résolue une fois au démarrage puis partagée en lecture seule.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub external_url: Url,
    pub bind: SocketAddr,
    pub schedule_timeout: Duration,
    pub health_timeout: Duration,
}

impl ProxyConfig {
    pub fn new(external_url: &str) -> Result<Self, ConfigError> {
        let external_url = parse_service_url(external_url)?;
        Ok(Self {
            external_url,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            schedule_timeout: DEFAULT_SCHEDULE_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_schedule_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("schedule"));
        }
        self.schedule_timeout = timeout;
        Ok(self)
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("health"));
        }
        self.health_timeout = timeout;
        Ok(self)
    }
}

fn parse_service_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let cfg = ProxyConfig::new("https://scheduler.example.com/api/run").unwrap();
        assert_eq!(cfg.schedule_timeout, Duration::from_secs(30));
        assert_eq!(cfg.health_timeout, Duration::from_secs(10));
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(ProxyConfig::new("ftp://scheduler.example.com").is_err());
        assert!(ProxyConfig::new("not a url").is_err());
    }

    #[test]
    fn rejects_zero_timeouts() {
        let cfg = ProxyConfig::new("http://localhost:9000").unwrap();
        assert!(cfg.with_schedule_timeout(Duration::ZERO).is_err());
    }
}
