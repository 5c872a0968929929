use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

pub fn level_from_verbosity(verbosity: u8, quiet: bool) -> LevelFilter {
  match verbosity {
    _ if quiet => LevelFilter::ERROR,
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  }
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over the
/// flags when set.
pub fn init_logging(verbosity: u8, quiet: bool) {
  let level = level_from_verbosity(verbosity, quiet);
  let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
  let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false);
  tracing_subscriber::registry().with(stderr_log.with_filter(filter)).init();
  debug!(level = %level, "Logger ready");
}

/// Spinner for network waits. Hidden when stderr is not a terminal or logs are
/// chatty enough to interleave with it.
pub fn spinner(message: &str, verbosity: u8) -> ProgressBar {
  let spinner = if verbosity >= 2 {
    ProgressBar::hidden()
  } else {
    ProgressBar::new_spinner()
  };
  if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
    spinner.set_style(style);
  }
  spinner.set_message(message.to_owned());
  spinner.enable_steady_tick(Duration::from_millis(100));
  spinner
}
