pub mod path;
pub mod settings;

use crate::errors::AppError;
use path::{expand_path, folio_path};
use settings::{CmsSettings, NewsSettings, Settings};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_API_VERSION: &str = "2025-09-24";
pub const DEFAULT_NEWS_ENDPOINT: &str = "https://content.guardianapis.com";
pub const DEFAULT_NEWS_SECTION: &str = "world";
pub const DEFAULT_REVALIDATE_SECS: u64 = 600;

/// Connection parameters for the content store. Only built when a project id
/// and dataset are both known.
#[derive(Debug, Clone, PartialEq)]
pub struct CmsConfig {
  pub project_id: String,
  pub dataset: String,
  pub api_version: String,
  pub use_cdn: bool,
  pub token: Option<String>,
  pub endpoint: Option<String>,
  pub image_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsConfig {
  pub api_key: Option<String>,
  pub endpoint: String,
  pub section: String,
  pub revalidate: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub cms: Option<CmsConfig>,
  pub news: NewsConfig,
  pub catalog_file: Option<PathBuf>,
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl CmsConfig {
  pub fn resolve<F>(settings: Option<&CmsSettings>, lookup: &F) -> Result<Option<CmsConfig>, AppError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = CmsSettings::default();
    let settings = settings.unwrap_or(&defaults);
    let project_id = non_blank(lookup("SANITY_PROJECT_ID")).or_else(|| non_blank(settings.project_id.clone()));
    let dataset = non_blank(lookup("SANITY_DATASET")).or_else(|| non_blank(settings.dataset.clone()));

    match (project_id, dataset) {
      (None, None) => Ok(None),
      (Some(_), None) => Err(AppError::ConfigError(
        "Missing CMS dataset (settings cms.dataset or SANITY_DATASET)".to_owned(),
      )),
      (None, Some(_)) => Err(AppError::ConfigError(
        "Missing CMS project id (settings cms.project_id or SANITY_PROJECT_ID)".to_owned(),
      )),
      (Some(project_id), Some(dataset)) => Ok(Some(CmsConfig {
        project_id,
        dataset,
        api_version: non_blank(lookup("SANITY_API_VERSION"))
          .or_else(|| non_blank(settings.api_version.clone()))
          .unwrap_or_else(|| DEFAULT_API_VERSION.to_owned()),
        use_cdn: settings.use_cdn.unwrap_or(true),
        token: non_blank(lookup("SANITY_TOKEN")).or_else(|| non_blank(settings.token.clone())),
        endpoint: non_blank(settings.endpoint.clone()),
        image_endpoint: non_blank(settings.image_endpoint.clone()),
      })),
    }
  }
}

impl NewsConfig {
  pub fn resolve<F>(settings: Option<&NewsSettings>, lookup: &F) -> NewsConfig
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = NewsSettings::default();
    let settings = settings.unwrap_or(&defaults);
    NewsConfig {
      api_key: non_blank(lookup("GUARDIAN_API_KEY")).or_else(|| non_blank(settings.api_key.clone())),
      endpoint: non_blank(settings.endpoint.clone()).unwrap_or_else(|| DEFAULT_NEWS_ENDPOINT.to_owned()),
      section: non_blank(settings.section.clone()).unwrap_or_else(|| DEFAULT_NEWS_SECTION.to_owned()),
      revalidate: Duration::from_secs(settings.revalidate_secs.unwrap_or(DEFAULT_REVALIDATE_SECS)),
    }
  }
}

impl Config {
  pub fn resolve<F>(settings: Settings, lookup: F) -> Result<Config, AppError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let cms = CmsConfig::resolve(settings.cms.as_ref(), &lookup)?;
    let news = NewsConfig::resolve(settings.news.as_ref(), &lookup);
    let catalog_file = non_blank(settings.catalog_file.clone()).map(PathBuf::from).map(expand_path);
    trace!(cms = cms.is_some(), news_key = news.api_key.is_some(), "resolved config");
    Ok(Config {
      cms,
      news,
      catalog_file,
    })
  }
}

fn read_settings() -> Result<Settings, AppError> {
  let paths = folio_path()?;
  if !paths.settings.exists() {
    debug!(path = %paths.settings.display(), "No settings file, using defaults");
    return Ok(Settings::default());
  }
  let raw = fs::read_to_string(&paths.settings)?;
  Ok(toml::from_str(&raw)?)
}

pub fn get_config() -> Result<Config, AppError> {
  let settings = read_settings()?;
  Config::resolve(settings, |key| env::var(key).ok())
}

pub fn write_settings(settings: &Settings, overwrite: bool) -> Result<PathBuf, AppError> {
  let paths = folio_path()?;
  if paths.settings.exists() && !overwrite {
    return Err(AppError::UserError(format!(
      "Settings file {} already exists, not gonna overwrite it for you",
      paths.settings.display()
    )));
  }
  paths.ensure_base_exists()?;
  let serialized = toml::to_string_pretty(settings)?;
  fs::write(&paths.settings, serialized)?;
  Ok(paths.settings)
}
