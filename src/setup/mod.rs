use crate::config::settings::Settings;
use crate::config::write_settings;
use crate::errors::AppError;
use tracing::info;

/// Writes the example settings so there is something to edit.
pub fn init(force: bool) -> Result<(), AppError> {
  let path = write_settings(&Settings::example(), force)?;
  info!(path = %path.display(), "Wrote settings");
  println!("Wrote example settings to {}", path.display());
  Ok(())
}
