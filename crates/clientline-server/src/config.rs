use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use clientline_events::HubConfig;

use crate::error::{ServerError, ServerResult};

/// Environment variable overriding [`ServerConfig::port`].
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding [`ServerConfig::host`].
pub const HOST_ENV: &str = "CLIENTLINE_HOST";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Path serving queries and mutations (POST) and subscriptions
    /// (WebSocket upgrade on GET).
    pub graphql_path: String,
    /// Serve the GraphiQL IDE at `/graphiql`.
    pub graphiql: bool,
    pub events: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            graphql_path: "/graphql".into(),
            graphiql: true,
            events: HubConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration: defaults, then the optional
    /// TOML file, then `PORT` / `CLIENTLINE_HOST` from the environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ServerError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("{PORT_ENV} is not a valid port: {port}")))?;
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("{HOST_ENV} is not a valid address: {host}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ServerResult<()> {
        if !self.graphql_path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "graphql_path must start with '/': {}",
                self.graphql_path
            )));
        }
        if matches!(self.graphql_path.as_str(), "/" | "/graphiql" | "/v1/health" | "/v1/info") {
            return Err(ServerError::Config(format!(
                "graphql_path collides with a built-in route: {}",
                self.graphql_path
            )));
        }
        if self.events.channel_capacity == 0 {
            return Err(ServerError::Config("events.channel_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Internal(e.to_string()))
    }
}
