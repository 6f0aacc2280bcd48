//! Server configuration.
//!
//! Everything is read from environment variables once, at startup, by [`ServerConfig::from_env_or_default`]. Invalid
//! values are logged and replaced with their defaults, so the server always starts with a usable configuration.
use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;
use score_engine::{cache::DEFAULT_CACHE_TTL, memory::MEMORY_STORE_URL};

const DEFAULT_SCORE_HOST: &str = "127.0.0.1";
const DEFAULT_SCORE_PORT: u16 = 8380;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/scores.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
pub const DEFAULT_CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; img-src 'self' data: https:; frame-src 'none'; object-src 'none'";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    /// How many events each hook can have queued before further events are dropped.
    pub event_buffer_size: usize,
    /// When set, every lifecycle event is also POSTed to this URL.
    pub event_webhook_url: Option<String>,
    /// The `Content-Security-Policy` header value. `None` omits the header.
    pub content_security_policy: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseConfig {
    Sqlite { url: String, max_connections: u32, run_migrations: bool },
    InMemory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, ttl: Duration::from_secs(DEFAULT_CACHE_TTL) }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SCORE_HOST.to_string(),
            port: DEFAULT_SCORE_PORT,
            database: DatabaseConfig::Sqlite {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
                run_migrations: true,
            },
            cache: CacheConfig::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            event_webhook_url: None,
            content_security_policy: Some(DEFAULT_CONTENT_SECURITY_POLICY.to_string()),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SCORE_HOST").ok().unwrap_or_else(|| DEFAULT_SCORE_HOST.into());
        let port = parse_env("SCORE_PORT", DEFAULT_SCORE_PORT);
        let database = database_config_from_env();
        let cache = CacheConfig {
            enabled: flag_from_env("SCORE_CACHE_ENABLED", true),
            ttl: Duration::from_secs(parse_env("SCORE_CACHE_TTL", DEFAULT_CACHE_TTL)),
        };
        let event_buffer_size = parse_env("SCORE_EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE).max(1);
        let event_webhook_url = env::var("SCORE_EVENT_WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty());
        let content_security_policy = match env::var("SCORE_CONTENT_SECURITY_POLICY") {
            Ok(s) if s.trim().eq_ignore_ascii_case("none") => {
                info!("🪛️ The Content-Security-Policy header is disabled.");
                None
            },
            Ok(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => Some(DEFAULT_CONTENT_SECURITY_POLICY.to_string()),
        };
        Self { host, port, database, cache, event_buffer_size, event_webhook_url, content_security_policy }
    }
}

fn database_config_from_env() -> DatabaseConfig {
    let url = env::var("SCORE_DATABASE_URL").ok().unwrap_or_else(|| {
        warn!("🪛️ SCORE_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
        DEFAULT_DATABASE_URL.to_string()
    });
    if url.trim().eq_ignore_ascii_case(MEMORY_STORE_URL) {
        warn!("🪛️ Using the in-memory match store. Matches will be lost when the server stops.");
        return DatabaseConfig::InMemory;
    }
    let max_connections = parse_env("SCORE_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
    let run_migrations = flag_from_env("SCORE_RUN_MIGRATIONS", true);
    DatabaseConfig::Sqlite { url, max_connections, run_migrations }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

fn flag_from_env(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                error!("🪛️ {s} is not a valid value for {name}. Using the default, {default}, instead.");
                default
            },
        },
        Err(_) => default,
    }
}
