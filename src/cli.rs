//! Drives the command-line program.

use crate::auth::CredentialConfig;
use crate::count::{LabelCounter, SortAlgorithm};
use crate::export;
use crate::geo::{Gazetteer, ToponymExtractor};
use crate::record::{Record, RecordKind};
use crate::reddit::client::{SortMethod, Subreddit};
use crate::reddit::service::RedditService;
use crate::sentiment::Report;
use crate::setup::{self, Bootstrap};
use crate::view::{ViewOptions, Viewable};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use indoc::formatdoc;
use log::warn;
use std::path::{Path, PathBuf};
use std::process;

pub fn die(error_code: i32, message: &str) {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Scrapes Reddit discussions and analyzes what it finds", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Credential config file
    #[arg(long, global = true, default_value = crate::auth::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report the credential scheme, access mode, and rate limit
    Auth,

    /// Tally the place names mentioned in scraped records
    #[clap(alias = "loc")]
    Locations(LocationsConfig),

    /// Scrape a subreddit's posts and comments into flat files
    #[clap(alias = "s")]
    Scrape(ScrapeConfig),

    /// Score scraped records with the VADER sentiment lexicon
    Sentiment {
        /// CSV file produced by `snooscrape scrape`
        input: PathBuf,
    },

    /// Download local data and validate the environment
    Setup {
        /// Re-download data even if it is already present
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct ScrapeConfig {
    /// Subreddit to scrape, without the "r/" prefix
    subreddit: String,

    /// Number of posts to fetch
    #[arg(short = 'n', long = "num-posts", default_value_t = 10)]
    num_posts: u32,

    /// Listing sort order
    #[arg(long, value_enum, default_value_t = SortMethod::New)]
    sort: SortMethod,

    /// CSV output file (defaults to <subreddit>.csv)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Plain-text output file (defaults to <subreddit>.txt)
    #[arg(long)]
    text: Option<PathBuf>,

    /// Print scraped records to the terminal as well
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Preview records in a more compact form
    #[arg(long, default_value_t = false)]
    oneline: bool,

    /// Print raw record bodies, without wrapping
    #[arg(long, default_value_t = false)]
    raw: bool,
}

#[derive(Args, Debug)]
struct LocationsConfig {
    /// CSV file produced by `snooscrape scrape`
    input: PathBuf,

    /// Sort output by number of mentions instead of alphabetically
    #[arg(short = 'c', long = "count", default_value_t = false)]
    sort_by_count: bool,
}

impl LocationsConfig {
    fn sort_algorithm(&self) -> SortAlgorithm {
        if self.sort_by_count {
            SortAlgorithm::Numerically
        } else {
            SortAlgorithm::Lexicographically
        }
    }
}

/// Runs the command-line program using the given configuration.
pub async fn run(config: Config) {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();
    Runner::new(config).run().await
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Runner {
        Self { config }
    }

    /// Run the command-line program using its stored configuration options.
    pub async fn run(&self) {
        match &self.config.command {
            Command::Auth => self.run_auth().await,
            Command::Locations(config) => self.run_locations(config),
            Command::Scrape(config) => self.run_scrape(config).await,
            Command::Sentiment { input } => self.run_sentiment(input),
            Command::Setup { force } => self.run_setup(*force).await,
        }
    }

    /// Builds the best available Reddit service.
    ///
    /// Any failure along the way -- unreadable config, undecryptable
    /// blobs, a rejected token request -- degrades to anonymous access
    /// with a diagnostic, never an abort. A student with a broken config
    /// still gets to scrape; they just get the smaller rate limit.
    async fn connect(&self) -> RedditService {
        let config = match CredentialConfig::load(&self.config.config) {
            Ok(config) => config,
            Err(err) => {
                warn!("no usable credential config: {err}");
                eprintln!(
                    "{}: using read-only access (60 requests/minute)",
                    "note".cyan()
                );
                return RedditService::anonymous();
            }
        };

        let credentials = match config.credentials() {
            Ok(credentials) => credentials,
            Err(err) => {
                eprintln!("{}: could not decrypt credentials: {err}", "warning".yellow());
                eprintln!("falling back to read-only access (60 requests/minute)");
                return RedditService::anonymous();
            }
        };

        match RedditService::authenticated(&config, &credentials).await {
            Ok(service) => service,
            Err(err) => {
                eprintln!("{}: could not authenticate: {err}", "warning".yellow());
                eprintln!("{}", self.connection_hints());
                eprintln!("falling back to read-only access (60 requests/minute)");
                RedditService::anonymous()
            }
        }
    }

    fn connection_hints(&self) -> String {
        formatdoc! {"
            Possible solutions:
              • check your internet connection
              • verify the Reddit API credentials in {}
              • try running the command again",
            self.config.config.display(),
        }
    }

    fn read_records(&self, input: &Path) -> Option<Vec<Record>> {
        match export::read_csv(input) {
            Ok(records) if records.is_empty() => {
                die(
                    2,
                    &format!(
                        "{} contains no records\nRun `snooscrape scrape` first, and check the subreddit name and sort order.",
                        input.display()
                    ),
                );
                None
            }
            Ok(records) => Some(records),
            Err(err) => {
                die(
                    1,
                    &format!("{err}\nRun `snooscrape scrape` to produce a records CSV first."),
                );
                None
            }
        }
    }

    async fn run_auth(&self) {
        match CredentialConfig::load(&self.config.config) {
            Ok(config) => {
                let decryptor = config.decryptor();
                let confidential = if decryptor.is_confidential() {
                    "yes".green()
                } else {
                    "no".red()
                };
                let service = self.connect().await;
                let mode = service.mode();
                println!(
                    "{}",
                    formatdoc! {"
                        Credential scheme: {}
                        Confidential: {confidential}
                        Access mode: {mode}
                        Rate limit: {} requests/minute",
                        decryptor.scheme(),
                        mode.rate_limit(),
                    }
                );
            }
            Err(err) => {
                eprintln!("{}: {err}", "note".cyan());
                println!(
                    "{}",
                    formatdoc! {"
                        Credential scheme: none
                        Access mode: read-only
                        Rate limit: 60 requests/minute"}
                );
            }
        }
    }

    async fn run_scrape(&self, config: &ScrapeConfig) {
        let service = self.connect().await;
        let subreddit = Subreddit::new(&config.subreddit, service);

        let records = match subreddit.scrape(config.num_posts, config.sort).await {
            Ok(records) => records,
            Err(err) => {
                die(1, &format!("{err}\n{}", self.connection_hints()));
                return;
            }
        };

        if records.is_empty() {
            die(
                2,
                &format!(
                    "no data collected from r/{}\nPossible solutions:\n  • check the subreddit name\n  • try a different sort order (--sort hot, --sort top)",
                    config.subreddit
                ),
            );
            return;
        }

        let csv_path = config
            .csv
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.csv", config.subreddit)));
        let text_path = config
            .text
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.txt", config.subreddit)));

        if let Err(err) = export::write_csv(&records, &csv_path) {
            die(1, &err.to_string());
            return;
        }
        if let Err(err) = export::write_text(&records, &text_path) {
            die(1, &err.to_string());
            return;
        }

        if config.preview || config.oneline {
            let opts = ViewOptions::build()
                .oneline(config.oneline)
                .raw(config.raw)
                .build();
            let joiner = if config.oneline { "\n" } else { "\n\n\n" };
            let output = records
                .iter()
                .map(|record| record.view(&opts))
                .collect::<Vec<_>>()
                .join(joiner);
            println!("{output}");
        }

        let posts = records
            .iter()
            .filter(|record| record.kind == RecordKind::Post)
            .count();
        let comments = records.len() - posts;
        println!(
            "Scraped {posts} posts and {comments} comments from r/{} into {} and {}",
            config.subreddit,
            csv_path.display(),
            text_path.display(),
        );
    }

    fn run_sentiment(&self, input: &Path) {
        let Some(records) = self.read_records(input) else {
            return;
        };
        let report = Report::from_records(&records);
        println!("{}", report.view(&ViewOptions::default()));
    }

    fn run_locations(&self, config: &LocationsConfig) {
        let Some(records) = self.read_records(&config.input) else {
            return;
        };

        let gazetteer = match Gazetteer::load(setup::gazetteer_path()) {
            Ok(gazetteer) => gazetteer,
            Err(err) => {
                die(
                    1,
                    &format!("{err}\nRun `snooscrape setup` to download the gazetteer."),
                );
                return;
            }
        };

        let extractor = ToponymExtractor::default();
        let mut places = Vec::new();
        for record in &records {
            let text = record.analysis_text();
            places.extend(extractor.toponyms(&text, &gazetteer));
        }

        let tally = LabelCounter::from_iter(places.into_iter());
        if tally.is_empty() {
            println!("No place names found in {}.", config.input.display());
            return;
        }

        let counts = tally
            .sort_by(&config.sort_algorithm())
            .collect::<Vec<_>>();
        println!("{}", counts.view(&ViewOptions::default()));
    }

    async fn run_setup(&self, force: bool) {
        match Bootstrap::new(force).run().await {
            Ok(summary) => println!("{}", summary.view(&ViewOptions::default())),
            Err(err) => {
                die(
                    1,
                    &format!(
                        "{err}\nPossible solutions:\n  • check your internet connection\n  • try running `snooscrape setup` again"
                    ),
                );
            }
        }
    }
}
