use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "user-service", version, about = "HTTP CRUD service for users")]
pub struct Config {
    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Key identifying the telemetry destination. Telemetry is disabled without it.
    #[arg(long, alias = "instrumentationKey", env = "INSTRUMENTATION_KEY")]
    pub instrumentation_key: Option<String>,

    /// OTLP collector endpoint.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Service name reported with every span and metric.
    #[arg(long, env = "SERVICE_NAME", default_value = "user-service")]
    pub service_name: String,

    /// PostgreSQL connection string. Users are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Parsed instrumentation key. `Ok(None)` when no key was given.
    pub fn telemetry_key(&self) -> anyhow::Result<Option<Uuid>> {
        match self.instrumentation_key.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .with_context(|| format!("Invalid instrumentation key {raw:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("user-service").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn port_flag_sets_listen_addr() {
        let config = parse(&["--port", "8080"]);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn accepts_camel_case_key_flag() {
        let key = Uuid::new_v4();
        let config = parse(&["--instrumentationKey", &key.to_string()]);
        assert_eq!(config.telemetry_key().unwrap(), Some(key));
    }

    #[test]
    fn blank_key_disables_telemetry() {
        let config = parse(&["--instrumentation-key", "  "]);
        assert_eq!(config.telemetry_key().unwrap(), None);
    }

    #[test]
    fn malformed_key_is_an_error() {
        let config = parse(&["--instrumentation-key", "not-a-key"]);
        let err = config.telemetry_key().unwrap_err();
        assert!(err.to_string().contains("not-a-key"));
    }
}
