//! Server configuration

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use mockapi_common::{Error, Result, Simulation};
use serde::{Deserialize, Serialize};

/// Mock API server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen host (IP literal)
    pub host: String,

    /// Listen port; 0 picks an ephemeral port
    pub port: u16,

    /// Directory served for paths no API route matches
    pub static_dir: PathBuf,

    /// Add no-store headers to static responses
    pub static_no_cache: bool,

    /// Delayed and unreliable route knobs
    pub simulation: Simulation,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("."),
            static_no_cache: false,
            simulation: Simulation::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.simulation.orders_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::InvalidConfig(format!(
                "orders_failure_rate must be within [0, 1], got {}",
                rate
            )));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.simulation.analytics_delay_ms, 2500);
        assert_eq!(cfg.simulation.orders_failure_rate, 0.3);
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockapi.toml");
        std::fs::write(
            &path,
            "port = 4010\n\n[simulation]\norders_failure_rate = 0.5\n",
        )
        .unwrap();

        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.port, 4010);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.simulation.orders_failure_rate, 0.5);
        assert_eq!(cfg.simulation.analytics_delay_ms, 2500);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/mockapi.toml");
        let cfg = ServerConfig {
            static_no_cache: true,
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let mut cfg = ServerConfig::default();
        cfg.simulation.orders_failure_rate = 1.5;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let cfg = ServerConfig {
            host: "not an ip".to_string(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "port = \"three thousand\"").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::ConfigParse(_))));
    }
}
