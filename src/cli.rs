use crate::config::CONFIG_FILE;
use crate::fetch::Api;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Wikipedia page holding the element table
    #[clap(long)]
    pub page: Option<String>,
    /// Wikipedia language code
    #[clap(long)]
    pub lang: Option<String>,
    /// Which API to fetch through
    #[clap(long, value_enum)]
    pub api: Option<Api>,
    /// Also fetch a summary for every normalised element
    #[clap(long)]
    pub summaries: bool,
}

#[derive(Args, Debug, Default)]
pub struct NormalizeArgs {
    /// Raw JSON file saved by `fetch` (defaults to the last fetched file)
    #[clap(long)]
    pub input: Option<PathBuf>,
    /// Language for article URLs (defaults to the raw file's language)
    #[clap(long)]
    pub lang: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a periodic-book.toml config file
    Config,
    /// Downloads the element table (and optionally summaries) from Wikipedia
    Fetch(FetchArgs),
    /// Converts the downloaded page into the element table
    Normalize(NormalizeArgs),
    /// Renders the cover SVG
    Cover,
    /// Renders the EPUB from the element table
    Render,
    /// Renders the cover and then the EPUB
    Build,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Configuration file
    #[clap(long, global = true, default_value = CONFIG_FILE, env = "PERIODIC_BOOK_CONFIG")]
    pub config: PathBuf,
    /// Log level, overridden by RUST_LOG
    #[clap(long, global = true, default_value = "warn")]
    pub log_level: LevelFilter,
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::parse_from([
            "periodic-book",
            "--log-level",
            "debug",
            "fetch",
            "--lang",
            "ja",
            "--api",
            "action",
            "--summaries",
        ]);
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.lang.as_deref(), Some("ja"));
        assert_eq!(args.api, Some(Api::Action));
        assert!(args.summaries);
        assert!(args.page.is_none());
    }
}
