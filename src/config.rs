//! Connection settings for the Math-Lock REST API and demo database
//!
//! Defaults point at the public demo deployment. Both sections can be loaded
//! from a JSON file and are then overridden by command-line flags.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// REST API location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Scheme and host, without port (e.g. `https://math-lock.com`)
    pub base_url: String,

    pub port: u16,

    /// Path prefix shared by all endpoints
    pub api_prefix: String,

    /// Value for an explicit `Host` header, if the server needs one
    pub host_header: Option<String>,
}

impl RestConfig {
    /// Public demo service
    pub fn public() -> Self {
        Self {
            base_url: "https://math-lock.com".to_string(),
            port: 443,
            api_prefix: "/api".to_string(),
            host_header: Some("www.math-lock.com".to_string()),
        }
    }

    /// Local server over plain HTTP, no `Host` override
    pub fn local(port: u16) -> Self {
        Self {
            base_url: "http://127.0.0.1".to_string(),
            port,
            api_prefix: "/api".to_string(),
            host_header: None,
        }
    }

    /// Full URL of an endpoint such as `/encrypt`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}:{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.port,
            self.api_prefix,
            path
        )
    }

    pub fn encrypt_url(&self) -> String {
        self.endpoint("/encrypt")
    }

    pub fn decrypt_url(&self) -> String {
        self.endpoint("/decrypt")
    }

    pub fn math_url(&self) -> String {
        self.endpoint("/math")
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self::public()
    }
}

/// PostgreSQL connection settings for the demo database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// No default; supply via config file, flag or environment
    pub password: Option<String>,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "46.4.106.106".to_string(),
            port: 54141,
            database: "mathlock_db".to_string(),
            user: "math_lock".to_string(),
            password: None,
        }
    }
}

#[cfg(feature = "db")]
impl DbConfig {
    /// Connection config for `tokio-postgres`
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.user);
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }
}

/// On-disk config file with optional `rest` and `db` sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub rest: RestConfig,
    pub db: DbConfig,
}

impl ConfigFile {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoints() {
        let config = RestConfig::default();
        assert_eq!(config.encrypt_url(), "https://math-lock.com:443/api/encrypt");
        assert_eq!(config.decrypt_url(), "https://math-lock.com:443/api/decrypt");
        assert_eq!(config.math_url(), "https://math-lock.com:443/api/math");
        assert_eq!(config.host_header.as_deref(), Some("www.math-lock.com"));
    }

    #[test]
    fn test_local_endpoint_trailing_slash() {
        let mut config = RestConfig::local(8080);
        config.base_url.push('/');
        assert_eq!(config.math_url(), "http://127.0.0.1:8080/api/math");
        assert!(config.host_header.is_none());
    }

    #[test]
    fn test_db_debug_hides_password() {
        let config = DbConfig {
            password: Some("hunter2".to_string()),
            ..DbConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("mathlock_db"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_partial_config_file() {
        let dir = std::env::temp_dir().join(format!("mathlock-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"rest": {"base_url": "http://localhost", "port": 5000}, "db": {"password": "pw"}}"#,
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.rest.encrypt_url(), "http://localhost:5000/api/encrypt");
        assert_eq!(config.rest.host_header.as_deref(), Some("www.math-lock.com"));
        assert_eq!(config.db.password.as_deref(), Some("pw"));
        assert_eq!(config.db.port, 54141);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConfigFile::load(Path::new("/nonexistent/mathlock.json")).unwrap_err();
        assert!(matches!(err, crate::error::MathLockError::Io(_)));
    }
}
