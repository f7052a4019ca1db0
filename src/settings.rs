//! C0 Settings/Bootstrap: the only place process environment is read. Everything
//! downstream (reference runtime, session store, HTTP bind address) is constructed
//! from the `Settings` value, never from ad-hoc `env::var` calls scattered elsewhere.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub locale: String,
    pub database_url: Option<String>,
    pub turn_deadline_ms: u64,
    /// Only consulted by the `server` feature's HTTP listener.
    #[allow(dead_code)]
    pub bind_addr: String,
}

impl Settings {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = std::env::var("TRIAGE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let locale = std::env::var("TRIAGE_LOCALE").unwrap_or_else(|_| "tr".to_string());
        let database_url = std::env::var("DATABASE_URL").ok();
        let turn_deadline_ms = std::env::var("TRIAGE_TURN_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2_000);
        let bind_addr =
            std::env::var("TRIAGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Required per the external-interfaces contract for admin endpoints; those
        // endpoints are tooling around the core and are not implemented by this binary,
        // so its absence is only logged, never fatal.
        if std::env::var("ADMIN_API_KEY").is_err() {
            tracing::warn!("ADMIN_API_KEY is not set; admin tooling endpoints would be unavailable");
        }

        Self {
            data_dir,
            locale,
            database_url,
            turn_deadline_ms,
            bind_addr,
        }
    }
}
