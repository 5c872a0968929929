pub mod model;
pub mod paginator;
pub mod static_source;

pub use model::{Id, Page, Project, Tag};
pub use paginator::{CatalogState, Paginator};
pub use static_source::StaticSource;

use crate::cms::RemoteSource;
use crate::config::Config;
use crate::errors::AppError;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{info, warn};

pub const PAGE_SIZE: usize = 9;

/// Read access to the project catalog.
pub trait CatalogSource {
  /// With `featured` set, every featured project newest first in one batch.
  /// Otherwise page `page` (1-based, clamped) of the full ordered catalog.
  async fn list(&self, featured: bool, page: u32) -> Result<Page, AppError>;

  async fn project(&self, slug: &str) -> Result<Option<Project>, AppError>;

  async fn tags(&self) -> Result<Vec<Tag>, AppError>;
}

/// Featured first, then newest `created_at`.
pub fn catalog_order(a: &Project, b: &Project) -> Ordering {
  b.featured.cmp(&a.featured).then_with(|| b.created_at.cmp(&a.created_at))
}

/// Stable, so equal keys keep their original relative order.
pub fn order_projects(projects: &mut [Project]) {
  projects.sort_by(catalog_order);
}

pub fn featured_only<'a, I>(projects: I) -> Vec<Project>
where
  I: IntoIterator<Item = &'a Project>,
{
  let mut featured: Vec<Project> = projects.into_iter().filter(|p| p.featured).cloned().collect();
  featured.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  featured
}

/// Clamped position of a page within a collection of `total` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
  pub total: usize,
  pub total_pages: u32,
  pub page: u32,
  pub offset: usize,
}

impl PageWindow {
  pub fn new(total: usize, requested: u32, page_size: usize) -> PageWindow {
    let total_pages = total.div_ceil(page_size).max(1) as u32;
    let page = requested.clamp(1, total_pages);
    PageWindow {
      total,
      total_pages,
      page,
      offset: (page as usize - 1) * page_size,
    }
  }

  pub fn end(&self, page_size: usize) -> usize {
    (self.offset + page_size).min(self.total)
  }

  pub fn into_page(self, results: Vec<Project>) -> Page {
    Page {
      results,
      count: self.total,
      page: self.page,
      next: if self.page < self.total_pages { Some(self.page + 1) } else { None },
      previous: if self.page > 1 { Some(self.page - 1) } else { None },
      error: None,
    }
  }
}

/// Slices an already ordered collection.
pub fn page_of(ordered: &[Project], requested: u32) -> Page {
  let window = PageWindow::new(ordered.len(), requested, PAGE_SIZE);
  let results = ordered[window.offset..window.end(PAGE_SIZE)].to_vec();
  window.into_page(results)
}

/// Deduplicates by id (first occurrence wins) and sorts by name.
pub fn unique_tags<I>(tags: I) -> Vec<Tag>
where
  I: IntoIterator<Item = Tag>,
{
  let mut seen: HashSet<Id> = HashSet::new();
  let mut unique: Vec<Tag> = tags.into_iter().filter(|t| seen.insert(t.id.clone())).collect();
  unique.sort_by(|a, b| a.name.cmp(&b.name));
  unique
}

pub fn tags_of<'a, I>(projects: I) -> Vec<Tag>
where
  I: IntoIterator<Item = &'a Project>,
{
  unique_tags(projects.into_iter().flat_map(|p| p.tags.iter().cloned()))
}

/// For render paths that must never fail: an unreachable or broken source turns
/// into an empty page that carries the error message.
pub async fn list_or_empty<S: CatalogSource>(source: &S, featured: bool, page: u32) -> Page {
  match source.list(featured, page).await {
    Ok(page) => page,
    Err(error) => {
      warn!(error = %error, page, featured, "Catalog unavailable, rendering empty state");
      Page::empty_with_error(error.to_string())
    }
  }
}

/// The source picked at startup: remote when a content store is configured,
/// the static catalog otherwise.
pub enum AnySource {
  Static(StaticSource),
  Remote(RemoteSource),
}

impl AnySource {
  pub fn from_config(config: &Config) -> Result<AnySource, AppError> {
    if let Some(ref cms) = config.cms {
      info!(project_id = %cms.project_id, dataset = %cms.dataset, "Using content store catalog");
      Ok(AnySource::Remote(RemoteSource::new(cms.clone())?))
    } else if let Some(ref path) = config.catalog_file {
      info!(path = %path.display(), "Using catalog file");
      Ok(AnySource::Static(StaticSource::from_file(path)?))
    } else {
      info!("Using built-in catalog");
      Ok(AnySource::Static(StaticSource::builtin()?))
    }
  }
}

impl CatalogSource for AnySource {
  async fn list(&self, featured: bool, page: u32) -> Result<Page, AppError> {
    match *self {
      AnySource::Static(ref s) => s.list(featured, page).await,
      AnySource::Remote(ref s) => s.list(featured, page).await,
    }
  }

  async fn project(&self, slug: &str) -> Result<Option<Project>, AppError> {
    match *self {
      AnySource::Static(ref s) => s.project(slug).await,
      AnySource::Remote(ref s) => s.project(slug).await,
    }
  }

  async fn tags(&self) -> Result<Vec<Tag>, AppError> {
    match *self {
      AnySource::Static(ref s) => s.tags().await,
      AnySource::Remote(ref s) => s.tags().await,
    }
  }
}


#[cfg(test)]
mod tests {
  use super::fixtures::*;
  use super::*;

  struct Broken;

  impl CatalogSource for Broken {
    async fn list(&self, _featured: bool, _page: u32) -> Result<Page, AppError> {
      Err(AppError::UpstreamError("content store returned 503".to_owned()))
    }
    async fn project(&self, _slug: &str) -> Result<Option<Project>, AppError> {
      Ok(None)
    }
    async fn tags(&self) -> Result<Vec<Tag>, AppError> {
      Ok(vec![])
    }
  }

  #[test]
  fn test_featured_first_then_newest() {
    let mut projects = vec![project("a", false, 5), project("b", true, 1), project("c", false, 9), project("d", true, 3)];
    order_projects(&mut projects);
    assert_eq!(slugs(&projects), vec!["project-d", "project-b", "project-c", "project-a"]);
  }

  #[test]
  fn test_order_is_stable_on_ties() {
    let mut projects = vec![project("x", false, 2), project("y", false, 2), project("z", false, 2)];
    order_projects(&mut projects);
    assert_eq!(slugs(&projects), vec!["project-x", "project-y", "project-z"]);
  }

  #[test]
  fn test_ordering_holds_pairwise() {
    let mut projects = many(30);
    order_projects(&mut projects);
    for pair in projects.windows(2) {
      let (a, b) = (&pair[0], &pair[1]);
      assert!(a.featured >= b.featured);
      if a.featured == b.featured {
        assert!(a.created_at >= b.created_at);
      }
    }
  }

  #[test]
  fn test_featured_only_newest_first() {
    let projects = vec![project("a", true, 1), project("b", false, 9), project("c", true, 7)];
    assert_eq!(slugs(&featured_only(&projects)), vec!["project-c", "project-a"]);
  }

  #[test]
  fn test_window_clamps() {
    assert_eq!(PageWindow::new(20, 0, 9).page, 1);
    assert_eq!(PageWindow::new(20, 3, 9).page, 3);
    assert_eq!(PageWindow::new(20, 99, 9).page, 3);
    assert_eq!(PageWindow::new(20, 99, 9).offset, 18);
    assert_eq!(PageWindow::new(0, 5, 9).total_pages, 1);
    assert_eq!(PageWindow::new(18, 2, 9).end(9), 18);
  }

  #[test]
  fn test_page_tokens() {
    let projects = many(20);
    let first = page_of(&projects, 1);
    assert_eq!((first.previous, first.next, first.count), (None, Some(2), 20));
    assert_eq!(first.results.len(), 9);
    let last = page_of(&projects, 3);
    assert_eq!((last.previous, last.next), (Some(2), None));
    assert_eq!(last.results.len(), 2);
  }

  #[test]
  fn test_out_of_range_pages_equal_last_page() {
    let projects = many(20);
    let last = page_of(&projects, 3);
    for requested in 3..10 {
      assert_eq!(page_of(&projects, requested), last);
    }
  }

  #[test]
  fn test_empty_collection_has_one_empty_page() {
    let page = page_of(&[], 4);
    assert_eq!(page.page, 1);
    assert!(page.results.is_empty());
    assert_eq!((page.next, page.previous), (None, None));
  }

  #[test]
  fn test_unique_tags_dedup_and_sort() {
    let tags = vec![tag("2", "Zeta"), tag("1", "Alpha"), tag("2", "Zeta")];
    assert_eq!(unique_tags(tags), vec![tag("1", "Alpha"), tag("2", "Zeta")]);
  }

  #[test]
  fn test_tags_of_projects() {
    let mut a = project("a", false, 1);
    a.tags = vec![tag("t2", "TypeScript"), tag("t1", "Next.js")];
    let mut b = project("b", false, 2);
    b.tags = vec![tag("t1", "Next.js"), tag("t3", "Astro")];
    let names: Vec<String> = tags_of(&[a, b]).into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Astro", "Next.js", "TypeScript"]);
  }

  #[tokio::test]
  async fn test_list_or_empty_carries_error() {
    let page = list_or_empty(&Broken, false, 1).await;
    assert!(page.results.is_empty());
    assert_eq!(page.error, Some("Upstream error: content store returned 503".to_owned()));
  }

  #[tokio::test]
  async fn test_list_or_empty_passes_pages_through() {
    let source = StaticSource::new(many(12)).unwrap();
    let page = list_or_empty(&source, false, 2).await;
    assert_eq!(page.error, None);
    assert_eq!(page.results.len(), 3);
  }
}
