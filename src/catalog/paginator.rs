use super::{CatalogSource, Page, Project};
use crate::errors::AppError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// What a "load more" list has shown so far.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct CatalogState {
  pub items: Vec<Project>,
  pub page: u32,
  pub has_more: bool,
}

impl CatalogState {
  fn from_first(page: Page) -> CatalogState {
    CatalogState {
      has_more: page.next.is_some() && !page.results.is_empty(),
      page: page.page,
      items: page.results,
    }
  }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// Accumulates catalog pages for one list. At most one request per paginator is
/// in flight; overlapping calls are rejected rather than queued.
pub struct Paginator<S> {
  source: S,
  in_flight: AtomicBool,
}

impl<S: CatalogSource> Paginator<S> {
  pub fn new(source: S) -> Paginator<S> {
    Paginator {
      source,
      in_flight: AtomicBool::new(false),
    }
  }

  fn begin(&self) -> Result<InFlight<'_>, AppError> {
    if self.in_flight.swap(true, Ordering::AcqRel) {
      Err(AppError::Busy("a catalog request is already in flight"))
    } else {
      Ok(InFlight(&self.in_flight))
    }
  }

  pub async fn first_page(&self) -> Result<CatalogState, AppError> {
    let _guard = self.begin()?;
    let page = self.source.list(false, 1).await?;
    Ok(CatalogState::from_first(page))
  }

  /// Appends the next page. A no-op once `has_more` is false.
  pub async fn load_more(&self, state: &CatalogState) -> Result<CatalogState, AppError> {
    if !state.has_more {
      return Ok(state.clone());
    }
    let _guard = self.begin()?;
    let next_page = state.page + 1;
    let fetched = self.source.list(false, next_page).await?;

    if fetched.page != next_page {
      warn!(requested = next_page, served = fetched.page, "Catalog shrank, nothing left to load");
      return Ok(CatalogState {
        items: state.items.clone(),
        page: state.page,
        has_more: false,
      });
    }

    debug!(page = next_page, added = fetched.results.len(), "Loaded more projects");
    let has_more = fetched.next.is_some() && !fetched.results.is_empty();
    let mut items = state.items.clone();
    items.extend(fetched.results);
    Ok(CatalogState {
      items,
      page: next_page,
      has_more,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::super::fixtures::*;
  use super::super::{StaticSource, Tag};
  use super::*;
  use std::sync::Arc;
  use tokio::sync::Notify;

  /// Holds every list request until released.
  struct Gated {
    inner: StaticSource,
    gate: Arc<Notify>,
  }

  impl CatalogSource for Gated {
    async fn list(&self, featured: bool, page: u32) -> Result<Page, AppError> {
      self.gate.notified().await;
      self.inner.list(featured, page).await
    }
    async fn project(&self, slug: &str) -> Result<Option<Project>, AppError> {
      self.inner.project(slug).await
    }
    async fn tags(&self) -> Result<Vec<Tag>, AppError> {
      self.inner.tags().await
    }
  }

  fn paginator(n: u32) -> Paginator<StaticSource> {
    Paginator::new(StaticSource::new(many(n)).unwrap())
  }

  #[tokio::test]
  async fn test_first_page() {
    let state = paginator(20).first_page().await.unwrap();
    assert_eq!(state.items.len(), 9);
    assert_eq!(state.page, 1);
    assert!(state.has_more);
  }

  #[tokio::test]
  async fn test_single_page_has_no_more() {
    let state = paginator(9).first_page().await.unwrap();
    assert_eq!(state.items.len(), 9);
    assert!(!state.has_more);
  }

  #[tokio::test]
  async fn test_empty_catalog_has_no_more() {
    let state = paginator(0).first_page().await.unwrap();
    assert!(state.items.is_empty());
    assert!(!state.has_more);
  }

  #[tokio::test]
  async fn test_load_more_is_monotonic() {
    let paginator = paginator(25);
    let mut state = paginator.first_page().await.unwrap();
    let mut history = vec![state.clone()];
    while state.has_more {
      state = paginator.load_more(&state).await.unwrap();
      history.push(state.clone());
    }
    assert_eq!(history.len(), 3);
    for pair in history.windows(2) {
      let (before, after) = (&pair[0], &pair[1]);
      assert!(after.items.len() > before.items.len());
      assert_eq!(&after.items[..before.items.len()], &before.items[..]);
    }
    let everything = StaticSource::new(many(25)).unwrap();
    assert_eq!(state.items, everything.projects());
    assert_eq!(state.page, 3);
  }

  #[tokio::test]
  async fn test_load_more_without_more_is_noop() {
    let paginator = paginator(25);
    let state = CatalogState {
      items: many(2),
      page: 1,
      has_more: false,
    };
    assert_eq!(paginator.load_more(&state).await.unwrap(), state);
  }

  #[tokio::test]
  async fn test_shrunk_catalog_stops_loading() {
    let paginator = paginator(5);
    let stale = CatalogState {
      items: many(9),
      page: 1,
      has_more: true,
    };
    let state = paginator.load_more(&stale).await.unwrap();
    assert_eq!(state.items, stale.items);
    assert_eq!(state.page, 1);
    assert!(!state.has_more);
  }

  #[tokio::test]
  async fn test_overlapping_load_more_is_rejected() {
    let gate = Arc::new(Notify::new());
    let paginator = Paginator::new(Gated {
      inner: StaticSource::new(many(30)).unwrap(),
      gate: gate.clone(),
    });
    let state = CatalogState {
      items: vec![],
      page: 1,
      has_more: true,
    };

    let first = paginator.load_more(&state);
    let second = async {
      tokio::task::yield_now().await;
      let result = paginator.load_more(&state).await;
      gate.notify_one();
      result
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().page, 2);
    assert!(matches!(second, Err(AppError::Busy(_))));

    // released after completion
    gate.notify_one();
    assert!(paginator.load_more(&state).await.is_ok());
  }
}
