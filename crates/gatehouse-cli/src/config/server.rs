//! HTTP server configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Result as AnyhowResult, bail};
use clap::Args;

use crate::TRACING_TARGET_CONFIG;

/// Upper bound for both timeouts, in seconds.
const MAX_TIMEOUT_SECS: u64 = 300;

/// HTTP server configuration.
///
/// Every option can be set with a CLI flag or the matching environment variable
/// (`HOST`, `PORT`, `REQUEST_TIMEOUT`, `SHUTDOWN_TIMEOUT`).
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port to listen on (1024-65535).
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds a request may take before it is answered with 504.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Seconds to wait for in-flight requests during shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// Validates ports and timeouts.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < 1024 {
            bail!(
                "Port {} is below 1024. Use ports 1024-65535 to avoid requiring root privileges.",
                self.port
            );
        }

        if self.request_timeout == 0 || self.request_timeout > MAX_TIMEOUT_SECS {
            bail!(
                "Request timeout {} seconds is invalid. Must be between 1 and {MAX_TIMEOUT_SECS} seconds.",
                self.request_timeout
            );
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > MAX_TIMEOUT_SECS {
            bail!(
                "Shutdown timeout {} seconds is invalid. Must be between 1 and {MAX_TIMEOUT_SECS} seconds.",
                self.shutdown_timeout
            );
        }

        Ok(())
    }

    /// Socket address the listener binds to.
    #[inline]
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    #[inline]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns `true` for `0.0.0.0` or `::`.
    #[inline]
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.host,
            port = self.port,
            request_timeout_secs = self.request_timeout,
            shutdown_timeout_secs = self.shutdown_timeout,
            "Server configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            request_timeout: 30,
            shutdown_timeout: 30,
        }
    }

    #[test]
    fn default_values_are_valid() {
        assert!(config().validate().is_ok());
        assert_eq!(config().server_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn privileged_port_is_rejected() {
        let config = ServerConfig { port: 80, ..config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeouts_are_bounded() {
        for (request, shutdown) in [(0, 30), (301, 30), (30, 0), (30, 301)] {
            let config = ServerConfig {
                request_timeout: request,
                shutdown_timeout: shutdown,
                ..config()
            };
            assert!(config.validate().is_err(), "{request}/{shutdown}");
        }
    }

    #[test]
    fn detects_unspecified_hosts() {
        assert!(!config().binds_to_all_interfaces());

        let v4 = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..config()
        };
        let v6 = ServerConfig {
            host: IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            ..config()
        };
        assert!(v4.binds_to_all_interfaces());
        assert!(v6.binds_to_all_interfaces());
    }
}
