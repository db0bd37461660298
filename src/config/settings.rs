//! Server configuration (eirene.yml)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "eirene.yml";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("unknown environment {:?}", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    pub server_address: String,

    // Directories
    pub content_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,

    // Content
    pub content_extensions: Vec<String>,
    pub skip_malformed: bool,

    // Code highlighting
    pub highlight_theme: String,
    pub line_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server_address: "127.0.0.1:4000".to_string(),

            content_dir: PathBuf::from("articles"),
            template_dir: PathBuf::from("ui/html"),
            static_dir: PathBuf::from("ui/static"),

            content_extensions: vec!["md".to_string(), "markdown".to_string()],
            skip_malformed: false,

            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// A missing file yields the defaults. Relative directories are resolved
    /// against the directory containing the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading overrides through `lookup`
    pub fn load_with<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            Self::parse(&content)?
        } else {
            Config::default()
        };

        config.apply_overrides(lookup)?;

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve(base_dir);

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply `ENVIRONMENT` and `HTTP_SERVER_ADDRESS` overrides
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("ENVIRONMENT").filter(|v| !v.trim().is_empty()) {
            self.environment = env.parse()?;
        }
        if let Some(addr) = lookup("HTTP_SERVER_ADDRESS").filter(|v| !v.trim().is_empty()) {
            self.server_address = addr.trim().to_string();
        }
        Ok(())
    }

    /// Make relative directories absolute with respect to `base_dir`
    pub fn resolve<P: AsRef<Path>>(&mut self, base_dir: P) {
        let base_dir = base_dir.as_ref();
        for dir in [
            &mut self.content_dir,
            &mut self.template_dir,
            &mut self.static_dir,
        ] {
            if dir.is_relative() {
                *dir = base_dir.join(&*dir);
            }
        }
    }
}
