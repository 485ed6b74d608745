use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::metadata::TmdbConfig;
use crate::notify::TelegramConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub requests: RequestsConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
///
/// The legacy library and the system's own records are separate databases,
/// mirroring the separate stores they migrate from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Requests, audit log.
    #[serde(default = "default_system_path")]
    pub system_path: PathBuf,
    /// Legacy library of existing files (read-only to the decision path).
    #[serde(default = "default_library_path")]
    pub library_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            system_path: default_system_path(),
            library_path: default_library_path(),
        }
    }
}

fn default_system_path() -> PathBuf {
    PathBuf::from("cinefile.db")
}

fn default_library_path() -> PathBuf {
    PathBuf::from("library.db")
}

/// Matching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Minimum combined score (0-100) for an available decision and for
    /// fuzzy completions.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Maximum year difference tolerated before penalizing/refusing a match.
    #[serde(default = "default_year_tolerance")]
    pub year_tolerance: i32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            year_tolerance: default_year_tolerance(),
        }
    }
}

fn default_threshold() -> f32 {
    90.0
}

fn default_year_tolerance() -> i32 {
    2
}

/// Request lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestsConfig {
    /// Maximum simultaneously pending requests per requester.
    #[serde(default = "default_max_pending")]
    pub max_pending: u32,
    /// How many most-recent pending requests the fuzzy fallback scans.
    #[serde(default = "default_pending_scan_limit")]
    pub pending_scan_limit: u32,
    /// Metadata search results returned per page.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self {
            max_pending: default_max_pending(),
            pending_scan_limit: default_pending_scan_limit(),
            results_per_page: default_results_per_page(),
        }
    }
}

fn default_max_pending() -> u32 {
    3
}

fn default_pending_scan_limit() -> u32 {
    100
}

fn default_results_per_page() -> u32 {
    5
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub matching: MatchingConfig,
    pub requests: RequestsConfig,
    pub tmdb: SanitizedTmdbConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<SanitizedTelegramConfig>,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
}

/// Sanitized Telegram config (bot token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub bot_token_configured: bool,
    pub admin_chat_id: i64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            matching: config.matching.clone(),
            requests: config.requests.clone(),
            tmdb: SanitizedTmdbConfig {
                api_key_configured: !config.tmdb.api_key.is_empty(),
            },
            telegram: config.telegram.as_ref().map(|t| SanitizedTelegramConfig {
                bot_token_configured: !t.bot_token.is_empty(),
                admin_chat_id: t.admin_chat_id,
            }),
        }
    }
}
