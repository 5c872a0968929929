use man::prelude::*;

fn main() {
  let page = Manual::new("folio")
    .about("Portfolio catalog, news feed and contact intake")
    .author(Author::new("Brocode").email("bros@brocode.sh"))
    .flag(
      Flag::new()
        .short("-h")
        .long("--help")
        .help("Print help information.")
    )
    .flag(
      Flag::new()
        .short("-q")
        .help("Make folio quiet.")
    )
    .flag(
      Flag::new()
        .short("-v")
        .help("Sets the level of verbosity. Repeat for more.")
    )
    .flag(
      Flag::new()
        .short("-V")
        .long("--version")
        .help("Print version information.")
    )
    .option(
      Opt::new("<OPTIONS>")
        .long("ls")
        .help("List one page of projects, featured first then newest. --page N, --featured, --json.")
    )
    .option(
      Opt::new("<OPTIONS>")
        .long("browse")
        .help("Load the catalog page by page, appending each page to what was already shown. --pages N, --json.")
    )
    .option(
      Opt::new("<SLUG>")
        .long("inspect")
        .help("Inspect project.")
    )
    .option(
      Opt::new("<SUBCOMMAND>")
        .long("tag")
        .help("Allows working with tags. `tag ls` lists every tag used by a project.")
    )
    .option(
      Opt::new("<OPTIONS>")
        .long("news")
        .help("World news, newest first. --page N, --watch, --json. Needs GUARDIAN_API_KEY.")
    )
    .option(
      Opt::new("--name <NAME> --email <EMAIL> --message <MESSAGE>")
        .long("contact")
        .help("Validate and send a contact message.")
    )
    .option(
      Opt::new("<OPTIONS>")
        .long("init")
        .help("Write an example settings file. --force overwrites an existing one.")
    )
    .env(Env::new("FOLIO_CONFIG_DIR").help("Directory holding settings.toml. Defaults to the platform config dir."))
    .env(Env::new("FOLIO_ENV").help("Prefix for the settings file name, e.g. staging_settings.toml."))
    .env(Env::new("SANITY_PROJECT_ID").help("Content store project id. Together with SANITY_DATASET switches the catalog to the content store."))
    .env(Env::new("SANITY_DATASET").help("Content store dataset."))
    .env(Env::new("SANITY_API_VERSION").help("Content store API version, default 2025-09-24."))
    .env(Env::new("SANITY_TOKEN").help("Optional read token for the content store."))
    .env(Env::new("GUARDIAN_API_KEY").help("API key for the news feed."))
    .env(Env::new("RUST_LOG").help("Overrides the log level chosen by -v and -q."))
    .render();
  println!("{}", page);
}
