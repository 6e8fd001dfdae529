// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, their defaults, and the [`Config`] loaded from
//! them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DEFAULT_RPC_URL` | JSON-RPC endpoint used when a request names none | `https://ethereum.publicnode.com` |
//! | `CONFIRMATION_POLL_MS` | Receipt poll interval in milliseconds | `2000` |
//! | `CONFIRMATION_MAX_RPC_ERRORS` | Consecutive receipt poll failures tolerated | `5` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use url::Url;

use crate::blockchain::ConfirmationPolicy;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Endpoint used when a request does not name one.
pub const DEFAULT_RPC_URL_ENV: &str = "DEFAULT_RPC_URL";
pub const CONFIRMATION_POLL_MS_ENV: &str = "CONFIRMATION_POLL_MS";
pub const CONFIRMATION_MAX_RPC_ERRORS_ENV: &str = "CONFIRMATION_MAX_RPC_ERRORS";

/// `json` for machine-readable logs, anything else for human-readable.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RPC_URL: &str = "https://ethereum.publicnode.com";
pub const DEFAULT_CONFIRMATION_POLL_MS: u64 = 2000;
pub const DEFAULT_CONFIRMATION_MAX_RPC_ERRORS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }

    /// Read `LOG_FORMAT` directly, before the rest of the config (and the
    /// subscriber that would report its warnings) exists.
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_rpc_url: String,
    pub confirmation: ConfirmationPolicy,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unparsable values fall back to the
    /// default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parsed(&lookup, PORT_ENV, DEFAULT_PORT);

        let default_rpc_url = match lookup(DEFAULT_RPC_URL_ENV) {
            Some(raw) => match Url::parse(&raw) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::warn!(var = DEFAULT_RPC_URL_ENV, value = %raw, error = %e, "Ignoring invalid value");
                    DEFAULT_RPC_URL.to_string()
                }
            },
            None => DEFAULT_RPC_URL.to_string(),
        };

        let poll_ms = parsed(&lookup, CONFIRMATION_POLL_MS_ENV, DEFAULT_CONFIRMATION_POLL_MS);
        let max_rpc_errors = parsed(
            &lookup,
            CONFIRMATION_MAX_RPC_ERRORS_ENV,
            DEFAULT_CONFIRMATION_MAX_RPC_ERRORS,
        )
        .max(1);

        let log_format = LogFormat::parse(lookup(LOG_FORMAT_ENV).as_deref());

        Self {
            host,
            port,
            default_rpc_url,
            confirmation: ConfirmationPolicy {
                poll_interval: Duration::from_millis(poll_ms),
                max_rpc_errors,
            },
            log_format,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(var = name, value = %raw, error = %e, "Ignoring invalid value");
                default
            }
        },
    }
}
