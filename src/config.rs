//! Configuration management for the RAX FTP client
//!
//! Defaults for the connection prompts and the session, loaded from an
//! optional `config.toml` with environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::transfer::TransferMode;

/// Environment variables `RAX_FTP_CLIENT_<FIELD>` override the file.
pub const ENV_PREFIX: &str = "RAX_FTP_CLIENT";

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// Host offered at the connection prompt
    /// Environment: RAX_FTP_CLIENT_HOST
    pub host: Option<String>,

    /// Control port offered at the connection prompt
    pub port: u16,

    /// Username used without prompting when set
    pub username: Option<String>,

    /// Representation type requested right after login
    pub transfer_mode: TransferMode,

    /// Shell prompt
    pub prompt: String,

    /// Initial local directory for `get`, `send` and the `l*` commands
    pub local_dir: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 21,
            username: None,
            transfer_mode: TransferMode::Binary,
            prompt: "ftp> ".to_string(),
            local_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from ./config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from `path` (extension optional) with
    /// environment overrides. A missing file leaves the defaults in place.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.prompt.is_empty() {
            return Err(config::ConfigError::Message("prompt cannot be empty".into()));
        }

        if matches!(&self.host, Some(host) if host.trim().is_empty()) {
            return Err(config::ConfigError::Message("host cannot be blank".into()));
        }

        if matches!(&self.username, Some(user) if user.trim().is_empty()) {
            return Err(config::ConfigError::Message(
                "username cannot be blank".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, contents).unwrap();
        let path = path.to_string_lossy().to_string();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 21);
        assert_eq!(config.transfer_mode, TransferMode::Binary);
        assert_eq!(config.host, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_config(
            "host = \"ftp.example.com\"\nport = 2121\n\
             transfer_mode = \"ascii\"\nusername = \"alice\"\n",
        );
        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.host.as_deref(), Some("ftp.example.com"));
        assert_eq!(config.port, 2121);
        assert_eq!(config.transfer_mode, TransferMode::Ascii);
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.prompt, "ftp> ");
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent");
        let config = ClientConfig::load_from(&path.to_string_lossy()).unwrap();
        assert_eq!(config.port, 21);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let (_dir, path) = write_config("port = 0\n");
        assert!(ClientConfig::load_from(&path).is_err());

        let (_dir, path) = write_config("host = \"  \"\n");
        assert!(ClientConfig::load_from(&path).is_err());

        let (_dir, path) = write_config("transfer_mode = \"ebcdic\"\n");
        assert!(ClientConfig::load_from(&path).is_err());
    }
}
