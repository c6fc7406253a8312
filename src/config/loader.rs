use super::schema::BridgeConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use std::path::Path;

pub async fn load_from_env_or_file() -> Result<BridgeConfig> {
    let config: BridgeConfig = Figment::new()
        // Try to load from various config files
        .merge(Toml::file("capbridge.toml"))
        .merge(Json::file("capbridge.json"))
        .merge(Yaml::file("capbridge.yaml"))
        .merge(Yaml::file("capbridge.yml"))
        // Override with environment variables (BRIDGE_ prefix)
        .merge(Env::prefixed("BRIDGE_"))
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

pub async fn load_from_path<P: AsRef<Path>>(path: P) -> Result<BridgeConfig> {
    let path = path.as_ref();

    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("BRIDGE_"))
            .extract(),
        Some("json") => Figment::new()
            .merge(Json::file(path))
            .merge(Env::prefixed("BRIDGE_"))
            .extract(),
        Some("yaml") | Some("yml") => Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("BRIDGE_"))
            .extract(),
        _ => {
            return Err(ConfigError::Parse(
                "Unsupported config file format. Use .toml, .json, .yaml, or .yml".into(),
            )
            .into())
        }
    };

    config.map_err(|e: figment::Error| ConfigError::Parse(e.to_string()).into())
}
