use crate::config::{Config, NewsConfig};
use crate::errors::AppError;
use crate::util::spinner;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use yansi::Paint;

pub const PAGE_SIZE: u32 = 12;

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Removes anything that looks like an HTML tag, including an unterminated one
/// at the end.
pub fn strip_html(raw: &str) -> String {
  TAGS.replace_all(raw, "").into_owned()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Article {
  pub id: String,
  pub title: String,
  pub url: String,
  pub published_at: DateTime<Utc>,
  pub section: String,
  pub trail_text: String,
  pub thumbnail: Option<String>,
  pub byline: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewsPage {
  pub results: Vec<Article>,
  pub current_page: u32,
  pub pages: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl NewsPage {
  fn failed(page: u32, message: String) -> NewsPage {
    NewsPage {
      results: vec![],
      current_page: page,
      pages: 1,
      error: Some(message),
    }
  }

  pub fn newer_page(&self) -> Option<u32> {
    if self.current_page > 1 { Some(self.current_page - 1) } else { None }
  }

  pub fn older_page(&self) -> Option<u32> {
    if self.current_page < self.pages { Some(self.current_page + 1) } else { None }
  }
}

#[derive(Deserialize, Debug)]
struct Envelope {
  response: RawResponse,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
  status: String,
  message: Option<String>,
  #[serde(default)]
  current_page: u32,
  #[serde(default)]
  pages: u32,
  #[serde(default)]
  results: Vec<RawArticle>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
  id: String,
  web_title: String,
  web_url: String,
  web_publication_date: DateTime<Utc>,
  section_name: String,
  fields: Option<RawFields>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawFields {
  trail_text: Option<String>,
  thumbnail: Option<String>,
  byline: Option<String>,
}

impl From<RawArticle> for Article {
  fn from(raw: RawArticle) -> Article {
    let fields = raw.fields.unwrap_or_default();
    Article {
      id: raw.id,
      title: raw.web_title,
      url: raw.web_url,
      published_at: raw.web_publication_date,
      section: raw.section_name,
      trail_text: strip_html(fields.trail_text.as_deref().unwrap_or_default()),
      thumbnail: fields.thumbnail,
      byline: fields.byline,
    }
  }
}

pub struct NewsClient {
  client: reqwest::Client,
  config: NewsConfig,
}

impl NewsClient {
  pub fn new(config: NewsConfig) -> Result<NewsClient, AppError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(NewsClient { client, config })
  }

  /// Never fails: every problem ends up in `NewsPage::error`.
  pub async fn fetch(&self, page: u32) -> NewsPage {
    let page = page.max(1);
    match self.try_fetch(page).await {
      Ok(news) => news,
      Err(error) => {
        warn!(page, error = %error, "News feed unavailable");
        NewsPage::failed(page, error.to_string())
      }
    }
  }

  async fn try_fetch(&self, page: u32) -> Result<NewsPage, AppError> {
    let api_key = self
      .config
      .api_key
      .as_deref()
      .ok_or_else(|| AppError::ConfigError("News feed needs GUARDIAN_API_KEY".to_owned()))?;
    let url = format!("{}/search", self.config.endpoint.trim_end_matches('/'));
    let page_param = page.to_string();
    let page_size = PAGE_SIZE.to_string();
    let params = [
      ("section", self.config.section.as_str()),
      ("order-by", "newest"),
      ("page-size", page_size.as_str()),
      ("page", page_param.as_str()),
      ("show-fields", "trailText,thumbnail,byline"),
      ("api-key", api_key),
    ];

    let response = self.client.get(url).query(&params).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(AppError::UpstreamError(format!("News feed returned status {}", status)));
    }
    let envelope: Envelope = serde_json::from_str(&body)?;
    let raw = envelope.response;
    if raw.status != "ok" {
      return Err(AppError::UpstreamError(format!(
        "News feed answered {}: {}",
        raw.status,
        raw.message.unwrap_or_default()
      )));
    }
    debug!(page, articles = raw.results.len(), pages = raw.pages, "Fetched news");
    Ok(NewsPage {
      results: raw.results.into_iter().map(Article::from).collect(),
      current_page: raw.current_page.max(1),
      pages: raw.pages.max(1),
      error: None,
    })
  }
}

/// Caches successful pages for the revalidation window.
pub struct NewsFeed {
  client: NewsClient,
  revalidate: Duration,
  cache: Mutex<HashMap<u32, (Instant, NewsPage)>>,
}

impl NewsFeed {
  pub fn new(client: NewsClient, revalidate: Duration) -> NewsFeed {
    NewsFeed {
      client,
      revalidate,
      cache: Mutex::new(HashMap::new()),
    }
  }

  pub fn revalidate(&self) -> Duration {
    self.revalidate
  }

  pub async fn page(&self, page: u32) -> NewsPage {
    let page = page.max(1);
    let mut cache = self.cache.lock().await;
    if let Some((fetched_at, cached)) = cache.get(&page) {
      if fetched_at.elapsed() < self.revalidate {
        debug!(page, "News page served from cache");
        return cached.clone();
      }
    }
    let fresh = self.client.fetch(page).await;
    if fresh.error.is_none() {
      cache.insert(page, (Instant::now(), fresh.clone()));
    } else {
      cache.remove(&page);
    }
    fresh
  }
}

fn print_page(news: &NewsPage) {
  if let Some(ref error) = news.error {
    println!("{}", Paint::red(error));
  }
  for article in &news.results {
    println!("{}", article.title.as_str().bold());
    if !article.trail_text.is_empty() {
      println!("  {}", article.trail_text);
    }
    println!(
      "  {} | {} | {}",
      article.published_at.format("%b %e, %Y, %H:%M").dim(),
      article.section,
      article.url.as_str().cyan()
    );
  }
  let newer = news.newer_page().map(|p| format!("<- newer: {}", p)).unwrap_or_default();
  let older = news.older_page().map(|p| format!("older: {} ->", p)).unwrap_or_default();
  println!("{}  Page {} of {}  {}", newer, news.current_page, news.pages, older);
}

/// Renders `page` on every revalidation tick until `shutdown` resolves. The
/// shutdown future lives across ticks, so a signal raised mid-fetch is kept.
async fn watch<F, S>(feed: &NewsFeed, page: u32, mut render: F, shutdown: S) -> Result<(), AppError>
where
  F: FnMut(&NewsPage) -> Result<(), AppError>,
  S: Future<Output = io::Result<()>>,
{
  let mut ticker = tokio::time::interval(feed.revalidate().max(Duration::from_secs(1)));
  tokio::pin!(shutdown);
  loop {
    tokio::select! {
      _ = ticker.tick() => {
        let news = feed.page(page).await;
        render(&news)?;
      }
      signal = &mut shutdown => {
        signal?;
        info!("Stopping news watch");
        return Ok(());
      }
    }
  }
}

fn render(news: &NewsPage, json: bool) -> Result<(), AppError> {
  if json {
    println!("{}", serde_json::to_string(news)?);
  } else {
    print_page(news);
  }
  Ok(())
}

pub async fn news(maybe_config: Result<Config, AppError>, page: u32, watch_mode: bool, json: bool, verbosity: u8) -> Result<(), AppError> {
  let config = maybe_config?;
  let revalidate = config.news.revalidate;
  let feed = NewsFeed::new(NewsClient::new(config.news)?, revalidate);
  if watch_mode {
    return watch(&feed, page, |news| render(news, json), tokio::signal::ctrl_c()).await;
  }
  let progress = spinner("Fetching news", verbosity);
  let news = feed.page(page).await;
  progress.finish_and_clear();
  render(&news, json)
}
