use super::{CatalogSource, Page, Project, Tag, featured_only, order_projects, page_of, tags_of};
use crate::errors::AppError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

#[derive(Deserialize)]
struct CatalogFile {
  #[serde(default)]
  projects: Vec<Project>,
}

/// In-process catalog. Ordered once at construction, so every request is a
/// plain slice.
#[derive(Debug, Clone)]
pub struct StaticSource {
  projects: Vec<Project>,
}

impl StaticSource {
  pub fn new(mut projects: Vec<Project>) -> Result<StaticSource, AppError> {
    let mut slugs: HashSet<&str> = HashSet::new();
    for project in &projects {
      if !slugs.insert(project.slug.as_str()) {
        return Err(AppError::UserError(format!("Duplicate project slug {} in catalog", project.slug)));
      }
    }
    for project in projects.iter_mut() {
      project.dedup_tags();
      project.image_url = project.image_url.take().filter(|url| !url.trim().is_empty());
    }
    order_projects(&mut projects);
    debug!(projects = projects.len(), "Static catalog ready");
    Ok(StaticSource { projects })
  }

  pub fn builtin() -> Result<StaticSource, AppError> {
    StaticSource::parse(BUILTIN_CATALOG)
  }

  pub fn from_file(path: &Path) -> Result<StaticSource, AppError> {
    let raw = fs::read_to_string(path)
      .map_err(|e| AppError::UserError(format!("Cannot read catalog file {}: {}", path.display(), e)))?;
    StaticSource::parse(&raw)
  }

  fn parse(raw: &str) -> Result<StaticSource, AppError> {
    let file: CatalogFile = toml::from_str(raw)?;
    StaticSource::new(file.projects)
  }

  #[cfg(test)]
  pub fn projects(&self) -> &[Project] {
    &self.projects
  }
}

impl CatalogSource for StaticSource {
  async fn list(&self, featured: bool, page: u32) -> Result<Page, AppError> {
    if featured {
      Ok(Page::batch(featured_only(&self.projects)))
    } else {
      Ok(page_of(&self.projects, page))
    }
  }

  async fn project(&self, slug: &str) -> Result<Option<Project>, AppError> {
    Ok(self.projects.iter().find(|p| p.slug == slug).cloned())
  }

  async fn tags(&self) -> Result<Vec<Tag>, AppError> {
    Ok(tags_of(&self.projects))
  }
}

#[cfg(test)]
mod tests {
  use super::super::fixtures::*;
  use super::*;

  #[test]
  fn test_builtin_catalog_parses() {
    let source = StaticSource::builtin().unwrap();
    assert_eq!(source.projects().len(), 6);
    assert_eq!(
      slugs(source.projects()),
      vec![
        "nigeria-w3n-conference",
        "cheaprides-ghana",
        "nigeria-blockchain-site",
        "marafiq-real-estate",
        "newmax-real-estate",
        "trailer-fie",
      ]
    );
  }

  #[test]
  fn test_duplicate_slug_rejected() {
    let mut twin = project("b", false, 2);
    twin.slug = "project-a".to_owned();
    let result = StaticSource::new(vec![project("a", false, 1), twin]);
    assert!(matches!(result, Err(AppError::UserError(_))));
  }

  #[test]
  fn test_duplicate_tag_ids_removed() {
    let mut p = project("a", false, 1);
    p.tags = vec![tag("t1", "Rust"), tag("t1", "Rust")];
    let source = StaticSource::new(vec![p]).unwrap();
    assert_eq!(source.projects()[0].tags, vec![tag("t1", "Rust")]);
  }

  #[test]
  fn test_catalog_from_file() {
    let dir = std::env::temp_dir().join(format!("folio-catalog-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("catalog.toml");
    fs::write(
      &path,
      r#"
[[projects]]
id = 1
title = "Only"
slug = "only"
created_at = "2025-02-01T00:00:00Z"
"#,
    )
    .unwrap();
    let source = StaticSource::from_file(&path).unwrap();
    assert_eq!(source.projects()[0].excerpt, "");
    assert_eq!(source.projects()[0].image_url, None);
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_blank_image_url_is_none() {
    let source = StaticSource::parse(
      r#"
[[projects]]
id = "a"
title = "Blank"
slug = "blank"
image_url = ""
created_at = "2025-02-01T00:00:00Z"

[[projects]]
id = "b"
title = "Spaces"
slug = "spaces"
image_url = "   "
created_at = "2025-02-02T00:00:00Z"

[[projects]]
id = "c"
title = "Kept"
slug = "kept"
image_url = "/projects/kept.jpg"
created_at = "2025-02-03T00:00:00Z"
"#,
    )
    .unwrap();
    let images: Vec<Option<&str>> = source.projects().iter().map(|p| p.image_url.as_deref()).collect();
    assert_eq!(images, vec![Some("/projects/kept.jpg"), None, None]);
  }

  #[test]
  fn test_missing_catalog_file() {
    let result = StaticSource::from_file(Path::new("/definitely/not/here.toml"));
    assert!(matches!(result, Err(AppError::UserError(_))));
  }

  #[tokio::test]
  async fn test_featured_batch_is_unpaginated() {
    let source = StaticSource::new(many(40)).unwrap();
    let page = source.list(true, 3).await.unwrap();
    assert_eq!(page.results.len(), 10);
    assert_eq!(page.count, 10);
    assert_eq!((page.next, page.previous), (None, None));
    assert!(page.results.iter().all(|p| p.featured));
    assert!(page.results.windows(2).all(|w| w[0].created_at >= w[1].created_at));
  }

  #[tokio::test]
  async fn test_pages_follow_catalog_order() {
    let source = StaticSource::new(many(20)).unwrap();
    let first = source.list(false, 1).await.unwrap();
    assert!(first.results[..5].iter().all(|p| p.featured));
    assert_eq!(first.next, Some(2));
    let clamped = source.list(false, 42).await.unwrap();
    assert_eq!(clamped, source.list(false, 3).await.unwrap());
  }

  #[tokio::test]
  async fn test_lookup_by_slug() {
    let source = StaticSource::builtin().unwrap();
    let found = source.project("trailer-fie").await.unwrap().unwrap();
    assert_eq!(found.title, "Trailer Fie");
    assert_eq!(source.project("nope").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_builtin_tags() {
    let source = StaticSource::builtin().unwrap();
    let names: Vec<String> = source.tags().await.unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Framer Motion", "Next.js", "Sanity", "TailwindCSS", "TypeScript"]);
  }
}
