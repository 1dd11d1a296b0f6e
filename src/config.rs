use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub hydrate: HydrateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://swapi.co/api".to_string()
}

impl ApiConfig {
    /// Build the URL of one catalog resource from its path, e.g.
    /// `people/42` or `films/1`.
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn people_url(&self, id: u32) -> String {
        self.resource_url(&format!("people/{}", id))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_name")]
    pub name: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            name: default_db_name(),
        }
    }
}

fn default_db_host() -> String {
    "localhost".to_string()
}
fn default_db_name() -> String {
    "swapi_db".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SampleConfig {
    /// Characters drawn per run.
    #[serde(default = "default_sample_count")]
    pub count: usize,
    /// Upper bound (inclusive) of the character id range.
    #[serde(default = "default_max_id")]
    pub max_id: u32,
    /// Id that is never sampled. The catalog has a permanent gap at this
    /// id and returns 404 for it.
    #[serde(default = "default_excluded_id")]
    pub excluded_id: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: default_sample_count(),
            max_id: default_max_id(),
            excluded_id: default_excluded_id(),
        }
    }
}

fn default_sample_count() -> usize {
    15
}
fn default_max_id() -> u32 {
    88
}
fn default_excluded_id() -> u32 {
    17
}

#[derive(Debug, Deserialize, Clone)]
pub struct HydrateConfig {
    /// Resource path of the film to hydrate, relative to the API base.
    #[serde(default = "default_film_path")]
    pub film_path: String,
    /// Output file path. Overwritten on every run.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for HydrateConfig {
    fn default() -> Self {
        Self {
            film_path: default_film_path(),
            output: default_output(),
        }
    }
}

fn default_film_path() -> String {
    "films/1".to_string()
}
fn default_output() -> PathBuf {
    PathBuf::from("task_two.json")
}

/// Load configuration from a TOML file. A missing file is not an error:
/// every setting has a built-in default.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.api.base_url.trim().is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }

    if config.sample.count == 0 {
        anyhow::bail!("sample.count must be > 0");
    }

    // At least one non-excluded id must exist for the redraw loop to
    // terminate.
    if config.sample.max_id < 2 {
        anyhow::bail!("sample.max_id must be >= 2");
    }

    Ok(config)
}
