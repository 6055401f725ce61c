//! # Configuration
//!
//! CLI flags, each also readable from the environment (and `.env`).

use clap::{Args, Command, FromArgMatches};
use skillhub_core::client::{ClientConfig, DEFAULT_BACKEND_URL};
use skillhub_core::proxy::{BuildConfig, ProxyConfigError, ProxyTable, DEFAULT_OUT_DIR};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5173;

/// Where the skills backend lives
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Backend origin
    #[arg(
        long,
        env = "SKILLHUB_BACKEND_URL",
        default_value = DEFAULT_BACKEND_URL,
        global = true
    )]
    pub backend: String,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = "SKILLHUB_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

impl BackendArgs {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.backend.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "SKILLHUB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "SKILLHUB_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,
}

impl ServeArgs {
    /// Settings used when no subcommand is given
    ///
    /// Parsed by clap with no flags, so `SKILLHUB_PORT` and `SKILLHUB_HOST`
    /// are validated exactly as they are for `skillhub serve`.
    pub fn from_env() -> Result<Self, clap::Error> {
        let matches = Self::augment_args(Command::new("serve")).try_get_matches_from(["serve"])?;
        Self::from_arg_matches(&matches)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory the bundle is written to
    #[arg(short, long, env = "SKILLHUB_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Keep existing files in the output directory
    #[arg(long)]
    pub keep_existing: bool,
}

impl ExportArgs {
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            out_dir: self.out_dir.clone(),
            empty_out_dir: !self.keep_existing,
        }
    }
}

/// Resolved settings for the development server
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub addr: SocketAddr,
    pub proxy: ProxyTable,
}

impl ServeConfig {
    pub fn from_args(serve: &ServeArgs, backend: &BackendArgs) -> Result<Self, ProxyConfigError> {
        Ok(Self {
            addr: serve.addr(),
            proxy: ProxyTable::for_backend(&backend.backend)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_args_to_client_config() {
        let args = BackendArgs {
            backend: "http://skills.internal:9000".to_string(),
            timeout_secs: Some(3),
        };
        let config = args.client_config();
        assert_eq!(config.base_url, "http://skills.internal:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.api_prefix, "/api/v1");
    }

    #[test]
    fn test_serve_config_targets_backend() {
        let serve = ServeArgs {
            port: 5173,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let backend = BackendArgs {
            backend: "http://127.0.0.1:9000".to_string(),
            timeout_secs: None,
        };

        let config = ServeConfig::from_args(&serve, &backend).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:5173");
        let rule = config.proxy.find("/api/v1/skills").unwrap();
        assert_eq!(rule.target_authority(), "127.0.0.1:9000");
    }

    #[test]
    fn test_serve_defaults_come_from_clap() {
        // Only test touching SKILLHUB_PORT
        std::env::set_var("SKILLHUB_PORT", "not-a-port");
        assert!(ServeArgs::from_env().is_err());

        std::env::set_var("SKILLHUB_PORT", "6006");
        assert_eq!(ServeArgs::from_env().unwrap().port, 6006);

        std::env::remove_var("SKILLHUB_PORT");
        let serve = ServeArgs::from_env().unwrap();
        assert_eq!(serve.port, DEFAULT_PORT);
        assert_eq!(serve.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_export_args_empty_by_default() {
        let args = ExportArgs {
            out_dir: PathBuf::from("dist"),
            keep_existing: false,
        };
        assert!(args.build_config().empty_out_dir);
    }
}
