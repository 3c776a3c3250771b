use crate::upload::TargetCollection;
use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::fs;
use url::Url;

const DEFAULT_UPLOAD_URL: &str = "http://localhost:5050/upload";
const DEFAULT_LOGIN_URL: &str = "http://localhost:3000/login";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    upload_url: Option<Url>,
    login_url: Option<Url>,
    default_collection: Option<TargetCollection>,
    log_level: Option<String>,
}

/// `UPLOADER_*` environment variables.
#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    upload_url: Option<Url>,
    login_url: Option<Url>,
    default_collection: Option<TargetCollection>,
    log_level: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub upload_url: Url,
    pub login_url: Url,
    pub default_collection: Option<TargetCollection>,
    pub log_level: String,
    pub access_token: Option<String>,
}

fn merge_config(base: ConfigFile, override_config: ConfigEnv) -> Result<Config> {
    let upload_url = match override_config.upload_url.or(base.upload_url) {
        Some(url) => url,
        None => Url::parse(DEFAULT_UPLOAD_URL)?,
    };
    let login_url = match override_config.login_url.or(base.login_url) {
        Some(url) => url,
        None => Url::parse(DEFAULT_LOGIN_URL)?,
    };

    Ok(Config {
        upload_url,
        login_url,
        default_collection: override_config
            .default_collection
            .or(base.default_collection),
        log_level: override_config
            .log_level
            .or(base.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        access_token: override_config.access_token,
    })
}

pub fn read_config() -> Result<Config> {
    let _ = dotenv();
    let env_config = envy::prefixed("UPLOADER_")
        .from_env::<ConfigEnv>()
        .context("invalid UPLOADER_* environment variable")?;

    let project_dirs = directories::ProjectDirs::from("com", "collection-uploader", "uploader")
        .ok_or(anyhow!("Unable to determine home directory"))?;
    let config_file = project_dirs.config_dir().join("config.toml");
    let file_config = if let Ok(config) = fs::read_to_string(&config_file) {
        toml::from_str(&config)
            .with_context(|| format!("failed to parse {}", config_file.display()))?
    } else {
        ConfigFile::default()
    };

    merge_config(file_config, env_config)
}
