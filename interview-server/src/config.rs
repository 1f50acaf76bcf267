use crate::error::{ApiError, ConfigError, Result};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

fn default_bind() -> String {
    "[::]:5003".into()
}

fn default_workers() -> usize {
    4
}

fn default_connection_rate() -> usize {
    256
}

fn default_database_path() -> PathBuf {
    PathBuf::from("interviews.sqlite")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_connection_rate")]
    pub max_connection_rate: usize,

    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Question catalog seeded into an empty question table
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: default_bind(),
            workers: default_workers(),
            max_connection_rate: default_connection_rate(),
            database_path: default_database_path(),
            catalog_file: None,
        }
    }
}

impl Config {
    pub fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ApiError::from(ConfigError::from(e)))
    }
}

pub fn load() -> Result<Config> {
    let mut settings = match std::env::var("CONFIG_FILE") {
        Err(_) => {
            if Path::new("settings.toml").exists() {
                Config::load(Path::new("settings.toml"))?
            } else {
                Config::default()
            }
        }
        Ok(settings_file) => Config::load(Path::new(&settings_file))?,
    };

    if settings.workers == 0 {
        return Err(ConfigError::Invalid {
            reason: "workers must be greater than 0".to_string(),
        }
        .into());
    }

    if let Ok(database_path) = std::env::var("DATABASE_PATH") {
        settings.database_path = PathBuf::from(database_path);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bind, "[::]:5003");
        assert_eq!(config.workers, 4);
        assert_eq!(config.database_path, PathBuf::from("interviews.sqlite"));
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("priority = 30").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "bind = \"unix:/run/interview.sock\"\ncatalog_file = \"catalog.toml\"\n",
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.bind, "unix:/run/interview.sock");
        assert_eq!(config.catalog_file, Some(PathBuf::from("catalog.toml")));
    }
}
