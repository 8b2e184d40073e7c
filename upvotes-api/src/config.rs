//! Server configuration read from the environment.
use axum::http::{HeaderValue, Method, header};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_http::cors::CorsLayer;

use crate::errors::ConfigError;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
const DEFAULT_IDENTITY_HEADER: &str = "x-actor-id";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Backing store for votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(ConfigError::invalid("STORE", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub store: StoreKind,
    /// Only read when `store` is `Postgres`.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub host: IpAddr,
    pub port: u16,
    /// Origin allowed by CORS.
    pub client_url: String,
    /// Header carrying the authenticated user id.
    pub identity_header: String,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `STORE`: `postgres` or `memory` (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL URL, required for the postgres store
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
    /// - `RUN_MIGRATIONS`: apply migrations at start-up (default: true)
    /// - `SERVER_HOST` / `SERVER_PORT`: bind address (default: 127.0.0.1:3000)
    /// - `CLIENT_URL`: CORS origin (default: http://localhost:5173)
    /// - `IDENTITY_HEADER`: header set by the auth proxy (default: x-actor-id)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE") {
            Some(value) => StoreKind::parse(&value)?,
            None => StoreKind::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            store,
            database_url,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            run_migrations: parse_bool_or(&lookup, "RUN_MIGRATIONS", true)?,
            host: parse_or(&lookup, "SERVER_HOST", DEFAULT_HOST)?,
            port: parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            client_url: lookup("CLIENT_URL").unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
            identity_header: lookup("IDENTITY_HEADER")
                .unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(key, value)),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::invalid(key, value)),
        },
        None => Ok(default),
    }
}

/// Create the CORS layer allowing the board client origin.
pub fn create_cors_layer(client_url: &str) -> Result<CorsLayer, ConfigError> {
    let origin = client_url
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::invalid("CLIENT_URL", client_url))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
