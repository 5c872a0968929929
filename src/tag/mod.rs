use crate::catalog::{AnySource, CatalogSource};
use crate::config::Config;
use crate::errors::AppError;
use tracing::debug;

pub async fn list_tags(maybe_config: Result<Config, AppError>) -> Result<(), AppError> {
  let config: Config = maybe_config?;
  let source = AnySource::from_config(&config)?;
  let tags = source.tags().await?;
  debug!(tags = tags.len(), "Listing tags");
  for tag in tags {
    println!("{}", tag.name);
  }
  Ok(())
}
