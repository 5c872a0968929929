use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CmsSettings {
  pub project_id: Option<String>,
  pub dataset: Option<String>,
  pub api_version: Option<String>,
  pub use_cdn: Option<bool>,
  pub token: Option<String>,
  /// Replaces `https://{project_id}.api.sanity.io`, e.g. for a caching proxy.
  pub endpoint: Option<String>,
  pub image_endpoint: Option<String>,
}

impl CmsSettings {
  pub fn example() -> CmsSettings {
    CmsSettings {
      project_id: Some("abcd1234".to_owned()),
      dataset: Some("production".to_owned()),
      api_version: Some("2025-09-24".to_owned()),
      use_cdn: Some(true),
      token: None,
      endpoint: None,
      image_endpoint: None,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NewsSettings {
  pub api_key: Option<String>,
  pub endpoint: Option<String>,
  pub section: Option<String>,
  pub revalidate_secs: Option<u64>,
}

impl NewsSettings {
  pub fn example() -> NewsSettings {
    NewsSettings {
      api_key: Some("guardianapikey".to_owned()),
      endpoint: None,
      section: Some("world".to_owned()),
      revalidate_secs: Some(600),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
  pub catalog_file: Option<String>,
  pub cms: Option<CmsSettings>,
  pub news: Option<NewsSettings>,
}

impl Settings {
  pub fn example() -> Settings {
    Settings {
      catalog_file: Some("~/.config/folio/catalog.toml".to_owned()),
      cms: Some(CmsSettings::example()),
      news: Some(NewsSettings::example()),
    }
  }
}
