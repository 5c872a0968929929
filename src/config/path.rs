use crate::errors::AppError;
use dirs::config_dir;
use std::env;
use std::path::PathBuf;

pub struct FolioPaths {
  pub settings: PathBuf,
  pub base: PathBuf,
}

impl FolioPaths {
  pub fn ensure_base_exists(&self) -> Result<(), AppError> {
    std::fs::create_dir_all(&self.base).map_err(|e| AppError::RuntimeError(format!("Failed to create folio config base directory. {}", e)))?;
    Ok(())
  }
}

fn do_expand(path: PathBuf, home_dir: Option<PathBuf>) -> PathBuf {
  match (path.strip_prefix("~"), home_dir) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path,
  }
}

pub fn expand_path(path: PathBuf) -> PathBuf {
  if path.starts_with("~") {
    do_expand(path, dirs::home_dir())
  } else {
    path
  }
}

fn settings_file_name(env_prefix: Option<String>) -> String {
  let prefix: String = env_prefix.map(|s| format!("{}_", s)).unwrap_or_default().replace('/', "");
  format!("{}settings.toml", prefix)
}

pub fn folio_path() -> Result<FolioPaths, AppError> {
  let base = env::var("FOLIO_CONFIG_DIR")
    .map(PathBuf::from)
    .ok()
    .map(expand_path)
    .or_else(|| {
      config_dir().map(|mut c| {
        c.push("folio");
        c
      })
    })
    .ok_or(AppError::InternalError("Cannot resolve folio config dir"))?;

  let env_prefix = env::var_os("FOLIO_ENV").map(|s| s.to_string_lossy().to_string());
  let mut settings = base.clone();
  settings.push(settings_file_name(env_prefix));

  Ok(FolioPaths { settings, base })
}
