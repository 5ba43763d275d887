use std::{env, net::SocketAddr, path::PathBuf};

pub const DEFAULT_NAMESPACE: &str = "dailyGlow";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PORT: u16 = 8080;

/// Startup settings, read from the environment once.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub namespace: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: resolve_data_dir(),
            namespace: env::var("APP_NAMESPACE")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DATA_DIR)
}
