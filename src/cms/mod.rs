pub mod image;

use crate::catalog::{CatalogSource, Id, PAGE_SIZE, Page, PageWindow, Project, Tag, unique_tags};
use crate::config::CmsConfig;
use crate::errors::AppError;
use chrono::{DateTime, Utc};
use image::{CARD_IMAGE, ImageUrlBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

const PROJECTION: &str = r#"{
  _id,
  title,
  "slug": slug.current,
  excerpt,
  description,
  "mainImage": mainImage.asset._ref,
  "tags": tags[]->{_id, name},
  demo_url,
  repo_url,
  featured,
  _createdAt,
  _updatedAt
}"#;

const CATALOG_ORDER: &str = "order(coalesce(featured, false) desc, _createdAt desc)";

fn page_query() -> String {
  format!(
    r#"{{"total": count(*[_type == "project"]), "items": *[_type == "project"] | {} [$offset...$end] {}}}"#,
    CATALOG_ORDER, PROJECTION
  )
}

fn featured_query() -> String {
  format!(r#"*[_type == "project" && featured == true] | order(_createdAt desc) {}"#, PROJECTION)
}

fn slug_query() -> String {
  format!(r#"*[_type == "project" && slug.current == $slug][0] {}"#, PROJECTION)
}

const TAGS_QUERY: &str = r#"*[_type == "tag" && count(*[_type == "project" && references(^._id)]) > 0]{_id, name}"#;

#[derive(Deserialize, Debug)]
struct QueryResponse<T> {
  result: T,
}

#[derive(Deserialize, Debug)]
struct RawTag {
  #[serde(rename = "_id")]
  id: String,
  name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawProject {
  #[serde(rename = "_id")]
  id: String,
  title: String,
  slug: String,
  excerpt: Option<String>,
  description: Option<String>,
  #[serde(rename = "mainImage")]
  main_image: Option<String>,
  // dangling references come back as null entries
  tags: Option<Vec<Option<RawTag>>>,
  demo_url: Option<String>,
  repo_url: Option<String>,
  featured: Option<bool>,
  #[serde(rename = "_createdAt")]
  created_at: DateTime<Utc>,
  #[serde(rename = "_updatedAt")]
  updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
struct RawPage {
  total: usize,
  items: Vec<RawProject>,
}

impl From<RawTag> for Tag {
  fn from(raw: RawTag) -> Tag {
    Tag {
      id: Id::Text(raw.id),
      name: raw.name.unwrap_or_default(),
    }
  }
}

/// Catalog backed by the content store's HTTP query API.
pub struct RemoteSource {
  client: reqwest::Client,
  config: CmsConfig,
  images: ImageUrlBuilder,
}

impl RemoteSource {
  pub fn new(config: CmsConfig) -> Result<RemoteSource, AppError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
      .build()?;
    let images = ImageUrlBuilder::new(config.image_endpoint.as_deref(), &config.project_id, &config.dataset)?;
    Ok(RemoteSource { client, config, images })
  }

  fn query_url(&self) -> String {
    let base = match self.config.endpoint {
      Some(ref endpoint) => endpoint.trim_end_matches('/').to_owned(),
      None => format!(
        "https://{}.{}.sanity.io",
        self.config.project_id,
        if self.config.use_cdn { "apicdn" } else { "api" }
      ),
    };
    format!("{}/v{}/data/query/{}", base, self.config.api_version, self.config.dataset)
  }

  async fn query<T>(&self, groq: &str, params: &[(&str, String)]) -> Result<T, AppError>
  where
    T: DeserializeOwned,
  {
    let mut query: Vec<(String, String)> = vec![("query".to_owned(), groq.to_owned())];
    query.extend(params.iter().map(|(name, value)| (format!("${}", name), value.clone())));
    trace!(params = ?params, "Querying content store");

    let mut request = self.client.get(self.query_url()).query(&query);
    if let Some(ref token) = self.config.token {
      request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(AppError::UpstreamError(format!(
        "Content store query failed with status {}: {}",
        status, body
      )));
    }
    let parsed: QueryResponse<T> = serde_json::from_str(&body)?;
    Ok(parsed.result)
  }

  async fn fetch_page(&self, offset: usize) -> Result<RawPage, AppError> {
    let params = [("offset", offset.to_string()), ("end", (offset + PAGE_SIZE).to_string())];
    self.query(&page_query(), &params).await
  }

  fn normalize(&self, raw: RawProject) -> Project {
    let image_url = raw.main_image.and_then(|reference| match self.images.url(&reference, &CARD_IMAGE) {
      Ok(url) => Some(url),
      Err(error) => {
        warn!(project = %raw.slug, error = %error, "Ignoring project image");
        None
      }
    });
    let tags: Vec<Tag> = raw.tags.unwrap_or_default().into_iter().flatten().map(Tag::from).collect();
    let mut project = Project {
      id: Id::Text(raw.id),
      title: raw.title,
      slug: raw.slug,
      excerpt: raw.excerpt.unwrap_or_default(),
      description: raw.description,
      image_url,
      tags,
      demo_url: raw.demo_url,
      repo_url: raw.repo_url,
      featured: raw.featured.unwrap_or(false),
      created_at: raw.created_at,
      updated_at: raw.updated_at,
    };
    project.dedup_tags();
    project
  }
}

impl CatalogSource for RemoteSource {
  async fn list(&self, featured: bool, page: u32) -> Result<Page, AppError> {
    if featured {
      let raw: Vec<RawProject> = self.query(&featured_query(), &[]).await?;
      return Ok(Page::batch(raw.into_iter().map(|r| self.normalize(r)).collect()));
    }

    let requested = page.max(1);
    let offset = (requested as usize - 1) * PAGE_SIZE;
    let mut raw = self.fetch_page(offset).await?;
    let window = PageWindow::new(raw.total, requested, PAGE_SIZE);
    if window.offset != offset {
      debug!(requested, served = window.page, "Clamping page to last page");
      raw = self.fetch_page(window.offset).await?;
    }
    let window = PageWindow::new(raw.total, requested, PAGE_SIZE);
    let results: Vec<Project> = raw.items.into_iter().map(|r| self.normalize(r)).collect();
    Ok(window.into_page(results))
  }

  async fn project(&self, slug: &str) -> Result<Option<Project>, AppError> {
    let params = [("slug", serde_json::to_string(slug)?)];
    let raw: Option<RawProject> = self.query(&slug_query(), &params).await?;
    Ok(raw.map(|r| self.normalize(r)))
  }

  async fn tags(&self) -> Result<Vec<Tag>, AppError> {
    let raw: Vec<Option<RawTag>> = self.query(TAGS_QUERY, &[]).await?;
    Ok(unique_tags(raw.into_iter().flatten().map(Tag::from)))
  }
}
