use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    busdesk_core::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedKind {
    Mock,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub kind: SeedKind,
    #[serde(default = "default_seed_count")]
    pub count: usize,
    /// JSON array of bookings, used when `kind = "file"`.
    pub path: Option<String>,
    /// Fixes the mock generator's output.
    pub rng_seed: Option<u64>,
}

fn default_seed_count() -> usize { 75 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", 3000_i64)?
            .set_default("dashboard.page_size", busdesk_core::DEFAULT_PAGE_SIZE as i64)?
            .set_default("seed.kind", "mock")?
            .set_default("seed.count", 75_i64)?
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg. `BUSDESK__SERVER__PORT=8080`
            .add_source(
                config::Environment::with_prefix("BUSDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_files() {
        let config = Config::load_from("does-not-exist").expect("defaults should deserialize");
        assert_eq!(config.dashboard.page_size, 15);
        assert_eq!(config.seed.kind, SeedKind::Mock);
        assert_eq!(config.seed.count, 75);
        assert!(config.seed.path.is_none());
    }
}
