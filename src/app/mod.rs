use clap::{Arg, ArgAction, Command, crate_version, value_parser};

pub fn app() -> Command {
  let arg_json = Arg::new("json")
    .help("output json instead of cool text")
    .short('j')
    .long("json")
    .num_args(0)
    .action(ArgAction::SetTrue);

  Command::new("folio")
    .version(crate_version!())
    .author("Brocode <bros@brocode.sh>")
    .about(
      "portfolio catalog, news feed and contact intake. Config set by FOLIO_CONFIG_DIR or default.
Set SANITY_PROJECT_ID and SANITY_DATASET to read the catalog from the content store.",
    )
    .subcommand_required(true)
    .arg(
      Arg::new("v")
        .short('v')
        .num_args(0)
        .action(ArgAction::Count)
        .help("Sets the level of verbosity"),
    )
    .arg(Arg::new("q").short('q').help("Make folio quiet").action(ArgAction::SetTrue).num_args(0))
    .subcommand(
      Command::new("ls")
        .about("List one page of projects, featured first")
        .arg(
          Arg::new("page")
            .long("page")
            .short('p')
            .default_value("1")
            .value_parser(value_parser!(u32))
            .help("Page to show. Out of range pages show the last page.")
            .num_args(1),
        )
        .arg(
          Arg::new("featured")
            .long("featured")
            .short('f')
            .help("Only featured projects, newest first, unpaginated")
            .num_args(0)
            .action(ArgAction::SetTrue),
        )
        .arg(arg_json.clone()),
    )
    .subcommand(
      Command::new("browse")
        .about("Load the catalog page by page like the project grid does")
        .arg(
          Arg::new("pages")
            .long("pages")
            .short('n')
            .value_parser(value_parser!(u32))
            .help("Stop after this many pages (default: until exhausted)")
            .num_args(1),
        )
        .arg(arg_json.clone()),
    )
    .subcommand(
      Command::new("inspect")
        .about("Inspect project")
        .arg(Arg::new("SLUG").value_name("SLUG").index(1).required(true))
        .arg(arg_json.clone()),
    )
    .subcommand(
      Command::new("tag")
        .alias("tags")
        .about("Allows working with tags.")
        .subcommand_required(true)
        .subcommand(Command::new("ls").alias("list").about("Lists tags used by projects")),
    )
    .subcommand(
      Command::new("news")
        .about("World news, newest first")
        .arg(
          Arg::new("page")
            .long("page")
            .short('p')
            .default_value("1")
            .value_parser(value_parser!(u32))
            .num_args(1),
        )
        .arg(
          Arg::new("watch")
            .long("watch")
            .short('w')
            .help("Refresh every revalidation interval until Ctrl-C")
            .num_args(0)
            .action(ArgAction::SetTrue),
        )
        .arg(arg_json),
    )
    .subcommand(
      Command::new("contact")
        .about("Validate and send a contact message")
        .arg(Arg::new("name").long("name").value_name("NAME").num_args(1).required(true))
        .arg(Arg::new("email").long("email").value_name("EMAIL").num_args(1).required(true))
        .arg(Arg::new("message").long("message").value_name("MESSAGE").num_args(1).required(true)),
    )
    .subcommand(
      Command::new("init")
        .about("Write an example settings file")
        .arg(
          Arg::new("force")
            .long("force")
            .help("Overwrite an existing settings file")
            .num_args(0)
            .action(ArgAction::SetTrue),
        ),
    )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_app_is_consistent() {
    app().debug_assert();
  }

  #[test]
  fn test_ls_arguments() {
    let matches = app().try_get_matches_from(["folio", "-vv", "ls", "--page", "3", "--featured"]).unwrap();
    assert_eq!(matches.get_count("v"), 2);
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "ls");
    assert_eq!(sub.get_one::<u32>("page"), Some(&3));
    assert!(sub.get_flag("featured"));
    assert!(!sub.get_flag("json"));
  }

  #[test]
  fn test_contact_requires_all_fields() {
    assert!(app().try_get_matches_from(["folio", "contact", "--name", "Al"]).is_err());
  }
}
