use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use episcrape_acquire::{AcquireConfig, BrowserOptions, ChromeSource};
use episcrape_acquire::config::PacingConfig;
use episcrape_model::Show;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "episcrape")]
#[command(about = "Scrape, validate and summarize TV episode metadata from IMDb")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ShowArg {
    BreakingBad,
    BetterCallSaul,
    /// Both shows, one after the other
    All,
}

impl ShowArg {
    fn shows(self) -> Vec<Show> {
        match self {
            ShowArg::BreakingBad => vec![Show::BreakingBad],
            ShowArg::BetterCallSaul => vec![Show::BetterCallSaul],
            ShowArg::All => Show::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CatalogShow {
    BreakingBad,
    BetterCallSaul,
}

impl From<CatalogShow> for Show {
    fn from(show: CatalogShow) -> Self {
        match show {
            CatalogShow::BreakingBad => Show::BreakingBad,
            CatalogShow::BetterCallSaul => Show::BetterCallSaul,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every catalogued episode page and write one CSV table per show
    Scrape {
        /// Which show's catalog to run
        #[arg(short, long, value_enum, default_value = "all")]
        show: ShowArg,

        /// Directory the episode tables are written to
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,

        /// JSON file overriding selectors, timeouts and pacing
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Chrome/Chromium executable (auto-detected if omitted)
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headful: bool,

        /// User-Agent header sent with every page request
        #[arg(long)]
        user_agent: Option<String>,

        /// Override the site root pages are fetched from
        #[arg(long)]
        base_url: Option<String>,

        /// Skip the randomized delay between page loads
        #[arg(long)]
        no_pacing: bool,

        /// Save each fetched page's HTML into this directory
        #[arg(long)]
        cache_html: Option<PathBuf>,
    },

    /// Print a show's catalog with the episode IDs it produces
    Catalog {
        #[arg(short, long, value_enum)]
        show: CatalogShow,
    },

    /// Check a written episode table for consistency
    Validate {
        /// Path to the episode CSV
        file: PathBuf,

        /// Also check rows against this show's catalog
        #[arg(short, long, value_enum)]
        show: Option<CatalogShow>,
    },

    /// Summaries over written episode tables
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
enum ReportAction {
    /// Rank directors by average episode rating across one or more tables
    Directors {
        /// Episode CSV files; repeat to combine shows
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Leave out directors with fewer episodes than this
        #[arg(long, default_value_t = 3)]
        min_episodes: usize,

        /// Write JSON here instead of printing a table
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Season x episode rating grid with colour bins
    Grid {
        /// Episode CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Write JSON here instead of printing the grid
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,headless_chrome=info",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,headless_chrome=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Scrape {
            show,
            output_dir,
            config,
            chrome_path,
            headful,
            user_agent,
            base_url,
            no_pacing,
            cache_html,
        } => {
            let mut acquire_config = match &config {
                Some(path) => AcquireConfig::from_json_file(path)?,
                None => AcquireConfig::default(),
            };
            if let Some(base_url) = base_url {
                acquire_config.fetch.base_url = base_url;
            }
            if no_pacing {
                acquire_config.pacing = PacingConfig::none();
            }
            if cache_html.is_some() {
                acquire_config.cache_dir = cache_html;
            }
            tracing::debug!(
                config = %serde_json::to_string(&acquire_config)?,
                "Effective configuration"
            );

            let options = BrowserOptions {
                chrome_path,
                headless: !headful,
                user_agent,
            };
            let mut source = ChromeSource::launch(&options, acquire_config.fetch.clone())?;

            for show in show.shows() {
                let catalog = show.catalog();
                let output = output_dir.join(&catalog.output_file);
                tracing::info!(show = %catalog.show, output = %output.display(), "Scraping");

                let summary =
                    episcrape_acquire::acquire(&mut source, &catalog, &acquire_config, &output)?;
                tracing::info!(
                    show = %catalog.show,
                    written = summary.records.len(),
                    skipped = summary.skipped.len(),
                    attempted = summary.attempted(),
                    path = %output.display(),
                    "Done"
                );
            }
        }
        Commands::Catalog { show } => {
            let catalog = Show::from(show).catalog();
            println!("{} ({} episodes)", catalog.show, catalog.len());
            for entry in catalog.entries() {
                println!("{}\t{}", entry.episode_id(), entry.external_id);
            }
        }
        Commands::Validate { file, show } => {
            tracing::info!(file = %file.display(), "Validating");
            let catalog = show.map(|s| Show::from(s).catalog());
            episcrape_validate::validate(&file, catalog.as_ref())?;
        }
        Commands::Report { action } => match action {
            ReportAction::Directors {
                inputs,
                min_episodes,
                json,
            } => {
                tracing::info!(inputs = inputs.len(), min_episodes, "Director report");
                episcrape_report::report_directors(&inputs, min_episodes, json.as_deref())
                    .context("Director report failed")?;
            }
            ReportAction::Grid { input, json } => {
                tracing::info!(input = %input.display(), "Rating grid");
                episcrape_report::report_grid(&input, json.as_deref())
                    .context("Rating grid failed")?;
            }
        },
    }

    Ok(())
}
