use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Environment variable that overrides `[cms].api_url`.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Used when neither the environment nor the config file names a CMS.
pub const DEFAULT_API_URL: &str = "http://localhost:1337";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CmsConfig {
    /// API host; also the base for relative image paths.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_products_path")]
    pub products_path: String,
    #[serde(default = "default_categories_path")]
    pub categories_path: String,
    /// Relation expansion requested on every read.
    #[serde(default = "default_populate")]
    pub populate: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            products_path: default_products_path(),
            categories_path: default_categories_path(),
            populate: default_populate(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_products_path() -> String {
    "/api/products".to_string()
}
fn default_categories_path() -> String {
    "/api/categories".to_string()
}
fn default_populate() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl CmsConfig {
    /// `api_url` without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Load and validate a config file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    finish(config)
}

/// Config for running without a file: defaults plus environment overrides.
pub fn default_config() -> Result<Config> {
    finish(Config::default())
}

fn finish(mut config: Config) -> Result<Config> {
    apply_env_overrides(&mut config, std::env::var(API_URL_ENV).ok());
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.cms.api_url = url.trim().to_string();
    }
}

pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.cms.api_url)
        .with_context(|| format!("cms.api_url is not a valid URL: '{}'", config.cms.api_url))?;
    match url.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("cms.api_url must use http or https, got '{}'", other),
    }

    for (key, path) in [
        ("cms.products_path", &config.cms.products_path),
        ("cms.categories_path", &config.cms.categories_path),
    ] {
        if !path.starts_with('/') {
            anyhow::bail!("{} must start with '/', got '{}'", key, path);
        }
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}
