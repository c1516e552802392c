use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory the organizational-structure image is written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// URL prefix stored in the identity table and used to serve uploads.
    #[serde(default = "default_public_upload_prefix")]
    pub public_upload_prefix: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Allowed CORS origin. Any origin is accepted when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    bind_addr: Option<String>,
    upload_dir: Option<PathBuf>,
    public_upload_prefix: Option<String>,
    log_dir: Option<String>,
    frontend_url: Option<String>,
    max_upload_bytes: Option<usize>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("/home/fhhp/uploads/img")
}

fn default_public_upload_prefix() -> String {
    "/uploads/img".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialServerConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                PartialServerConfig::default()
            }
        } else {
            PartialServerConfig::default()
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    fn merge(env_config: PartialServerConfig, file_config: PartialServerConfig) -> Result<Self, String> {
        let public_upload_prefix = env_config
            .public_upload_prefix
            .or(file_config.public_upload_prefix)
            .unwrap_or_else(default_public_upload_prefix);
        let public_upload_prefix = public_upload_prefix.trim_end_matches('/').to_string();
        if !public_upload_prefix.starts_with('/') {
            return Err("PUBLIC_UPLOAD_PREFIX must start with '/' and not be the root path".to_string());
        }

        Ok(ServerConfig {
            database_url: env_config.database_url.or(file_config.database_url)
                .ok_or("DATABASE_URL is required")?,
            bind_addr: env_config.bind_addr.or(file_config.bind_addr)
                .unwrap_or_else(default_bind_addr),
            upload_dir: env_config.upload_dir.or(file_config.upload_dir)
                .unwrap_or_else(default_upload_dir),
            public_upload_prefix,
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            frontend_url: env_config.frontend_url.or(file_config.frontend_url),
            max_upload_bytes: env_config.max_upload_bytes.or(file_config.max_upload_bytes)
                .unwrap_or_else(default_max_upload_bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file() {
        let file: PartialServerConfig = toml::from_str(
            r#"
            database_url = "postgres://file/db"
            bind_addr = "127.0.0.1:8000"
            upload_dir = "/srv/uploads"
            "#,
        )
        .unwrap();
        let env = PartialServerConfig {
            database_url: Some("postgres://env/db".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::merge(env, file).unwrap();
        assert_eq!(config.database_url, "postgres://env/db");
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.public_upload_prefix, "/uploads/img");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn test_database_url_is_required() {
        let err = ServerConfig::merge(PartialServerConfig::default(), PartialServerConfig::default())
            .unwrap_err();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    fn test_upload_prefix_is_normalized() {
        let env = PartialServerConfig {
            database_url: Some("sqlite::memory:".to_string()),
            public_upload_prefix: Some("/media/img/".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::merge(env, PartialServerConfig::default()).unwrap();
        assert_eq!(config.public_upload_prefix, "/media/img");

        for bad in ["/", "media"] {
            let env = PartialServerConfig {
                database_url: Some("sqlite::memory:".to_string()),
                public_upload_prefix: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(ServerConfig::merge(env, PartialServerConfig::default()).is_err(), "{bad}");
        }
    }
}
