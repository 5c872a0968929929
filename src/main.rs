use crate::errors::AppError;
use clap::ArgMatches;
use std::time::Instant;
use tracing::{debug, error};

mod app;
mod catalog;
mod cms;
mod config;
mod contact;
mod errors;
mod news;
mod project;
mod setup;
mod tag;
#[cfg(test)]
mod test_server;
mod util;

fn main() {
  // SAFETY: still single threaded, the runtime is started afterwards.
  unsafe {
    openssl_probe::init_openssl_env_vars();
  }

  let return_code = match runtime() {
    Ok(runtime) => runtime.block_on(_main()),
    Err(error) => {
      eprintln!("{}", error);
      1
    }
  };
  std::process::exit(return_code)
}

fn runtime() -> Result<tokio::runtime::Runtime, AppError> {
  Ok(tokio::runtime::Builder::new_multi_thread().enable_all().build()?)
}

async fn _main() -> i32 {
  let matches = app::app().get_matches();

  let verbosity = matches.get_count("v");
  let quiet = matches.get_flag("q");
  util::init_logging(verbosity, quiet);

  let started = Instant::now();
  let result = dispatch(&matches, verbosity).await;
  debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Done");

  match result {
    Ok(()) => 0,
    Err(error) => {
      error!(error = %error, "Error running command");
      1
    }
  }
}

async fn dispatch(matches: &ArgMatches, verbosity: u8) -> Result<(), AppError> {
  let subcommand_name = AppError::require(matches.subcommand_name(), AppError::InternalError("No subcommand provided"))?;
  let subcommand_matches = AppError::require(
    matches.subcommand_matches(subcommand_name),
    AppError::InternalError("No subcommand matches"),
  )?;
  let json = || subcommand_matches.try_get_one::<bool>("json").ok().flatten().copied().unwrap_or(false);

  match subcommand_name {
    "init" => setup::init(subcommand_matches.get_flag("force")),
    "ls" => {
      let page = subcommand_matches.get_one::<u32>("page").copied().unwrap_or(1);
      let featured = subcommand_matches.get_flag("featured");
      project::ls(config::get_config(), page, featured, json(), verbosity).await
    }
    "browse" => {
      let pages = subcommand_matches.get_one::<u32>("pages").copied();
      project::browse(config::get_config(), pages, json(), verbosity).await
    }
    "inspect" => {
      let slug = subcommand_matches
        .get_one::<String>("SLUG")
        .ok_or(AppError::InternalError("argument SLUG is required"))?;
      project::inspect(slug, config::get_config(), json()).await
    }
    "tag" => {
      let tag_subcommand = subcommand_matches.subcommand_name().ok_or(AppError::InternalError("No tag subcommand"))?;
      match tag_subcommand {
        "ls" => tag::list_tags(config::get_config()).await,
        _ => Err(AppError::InternalError("Command not implemented")),
      }
    }
    "news" => {
      let page = subcommand_matches.get_one::<u32>("page").copied().unwrap_or(1);
      let watch = subcommand_matches.get_flag("watch");
      news::news(config::get_config(), page, watch, json(), verbosity).await
    }
    "contact" => {
      let arg = |name: &'static str| {
        subcommand_matches
          .get_one::<String>(name)
          .ok_or(AppError::InternalError("contact arguments are required"))
      };
      contact::contact(arg("name")?, arg("email")?, arg("message")?).await
    }
    _ => Err(AppError::InternalError("Command not implemented")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_runtime_runs_futures() {
    let runtime = runtime().unwrap();
    assert_eq!(runtime.block_on(async { tokio::task::spawn(async { 41 + 1 }).await.unwrap() }), 42);
  }
}
