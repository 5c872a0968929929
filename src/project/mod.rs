use crate::catalog::{AnySource, CatalogSource, CatalogState, Page, Paginator, Project, list_or_empty};
use crate::config::Config;
use crate::errors::AppError;
use crate::util::spinner;
use tracing::{debug, info};
use yansi::Paint;

fn print_card(project: &Project) {
  let marker = if project.featured { "*" } else { " " };
  println!("{} {:<32} {}", Paint::yellow(marker), project.slug.as_str().bold(), project.title);
  if !project.excerpt.is_empty() {
    println!("  {}", project.excerpt.as_str().dim());
  }
}

fn print_page(page: &Page) {
  if let Some(ref error) = page.error {
    println!("{}", Paint::red(error));
  }
  if page.results.is_empty() && page.error.is_none() {
    println!("No projects yet");
  }
  for project in &page.results {
    print_card(project);
  }
  let previous = page.previous.map(|p| p.to_string()).unwrap_or_else(|| "-".to_owned());
  let next = page.next.map(|p| p.to_string()).unwrap_or_else(|| "-".to_owned());
  println!("Page {} ({} projects, previous: {}, next: {})", page.page, page.count, previous, next);
}

/// One page for display. Source failures become an empty page with a message
/// instead of an error.
pub async fn ls(maybe_config: Result<Config, AppError>, page: u32, featured: bool, json: bool, verbosity: u8) -> Result<(), AppError> {
  let config = maybe_config?;
  let source = AnySource::from_config(&config)?;
  let progress = spinner("Loading projects", verbosity);
  let page = list_or_empty(&source, featured, page).await;
  progress.finish_and_clear();
  if json {
    println!("{}", serde_json::to_string(&page)?);
  } else {
    print_page(&page);
  }
  Ok(())
}

/// Walks the catalog with "load more" semantics, printing each appended batch.
pub async fn browse(maybe_config: Result<Config, AppError>, max_pages: Option<u32>, json: bool, verbosity: u8) -> Result<(), AppError> {
  let config = maybe_config?;
  let paginator = Paginator::new(AnySource::from_config(&config)?);
  let progress = spinner("Loading projects", verbosity);
  let mut state: CatalogState = paginator.first_page().await?;
  let mut shown = 0;
  let mut loaded = 1;
  loop {
    progress.suspend(|| {
      for project in &state.items[shown..] {
        print_card(project);
      }
    });
    shown = state.items.len();
    if !state.has_more || max_pages.is_some_and(|max| loaded >= max) {
      break;
    }
    state = paginator.load_more(&state).await?;
    loaded += 1;
  }
  progress.finish_and_clear();
  info!(projects = state.items.len(), pages = state.page, "Finished browsing");
  if json {
    println!("{}", serde_json::to_string(&state)?);
  } else if state.has_more {
    println!("{} projects shown, more available", state.items.len());
  } else {
    println!("{} projects shown", state.items.len());
  }
  Ok(())
}

pub async fn inspect(slug: &str, maybe_config: Result<Config, AppError>, json: bool) -> Result<(), AppError> {
  let config = maybe_config?;
  let source = AnySource::from_config(&config)?;
  debug!(slug, "Looking up project");
  let project = source
    .project(slug)
    .await?
    .ok_or_else(|| AppError::UserError(format!("project {} not found", slug)))?;
  if json {
    println!("{}", serde_json::to_string(&project)?);
    return Ok(());
  }
  println!("{}", project.title.as_str().underline().bold());
  println!("{:<20}: {}", "Slug", project.slug);
  println!("{:<20}: {}", "Id", project.id);
  println!("{:<20}: {}", "Featured", project.featured);
  println!("{:<20}: {}", "Description", project.description());
  let tags: Vec<&str> = project.tags.iter().map(|t| t.name.as_str()).collect();
  println!("{:<20}: {}", "Tags", if tags.is_empty() { "None".to_owned() } else { tags.join(", ") });
  println!("{:<20}: {}", "Image", project.image_url.as_deref().unwrap_or("None"));
  println!("{:<20}: {}", "Demo", project.demo_url.as_deref().unwrap_or("None"));
  println!("{:<20}: {}", "Repository", project.repo_url.as_deref().unwrap_or("None"));
  println!("{:<20}: {}", "Created", project.created_at.to_rfc3339());
  if let Some(updated_at) = project.updated_at {
    println!("{:<20}: {}", "Updated", updated_at.to_rfc3339());
  }
  Ok(())
}
