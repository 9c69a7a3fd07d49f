use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    pub cors_origins: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub predictor_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = match std::env::var("PORT") {
            Ok(p) => p.parse().unwrap_or_else(|_| {
                warn!("[phishguard] Invalid PORT value, defaulting to 5000");
                5000
            }),
            Err(_) => 5000,
        };

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let cors_origins = std::env::var("CORS_ORIGINS").ok();

        let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
        if let Some(ref dir) = static_dir {
            if !dir.is_dir() {
                warn!("[phishguard] STATIC_DIR {:?} is not a directory, using built-in page", dir);
            }
        }

        let predictor_url = std::env::var("PREDICTOR_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        Self {
            port,
            base_url,
            cors_origins,
            static_dir,
            predictor_url,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            base_url: "http://localhost".to_string(),
            cors_origins: None,
            static_dir: None,
            predictor_url: None,
        }
    }
}
