//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lexisync_cache::ContentCache;
use lexisync_core::{SyncProgress, SyncReport, sync_courses};
use lexisync_provider::{Credentials, HttpCourseProvider};
use lexisync_shared::{AppConfig, config, init_config, load_config};
use lexisync_store::MongoStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LexiSync — sync provider vocabulary into a document store.
#[derive(Parser)]
#[command(
    name = "lexisync",
    version,
    about = "Sync courses, skills, and vocabulary from a language-learning provider into MongoDB.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the sync pipeline for the configured courses.
    Sync {
        /// Course code(s) to sync, overriding the configured allow-list
        /// (can be specified multiple times).
        #[arg(short, long = "course")]
        courses: Vec<String>,

        /// Cache directory override.
        #[arg(long)]
        cache_dir: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lexisync=info",
        1 => "lexisync=debug",
        _ => "lexisync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync { courses, cache_dir } => cmd_sync(&courses, cache_dir.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

async fn cmd_sync(course_override: &[String], cache_dir: Option<&str>) -> Result<()> {
    let config = load_config()?;

    let allow_list: Vec<String> = if course_override.is_empty() {
        config.courses.clone()
    } else {
        course_override.to_vec()
    };
    if allow_list.is_empty() {
        return Err(eyre!(
            "no courses configured — add them to lexisync.toml or pass --course"
        ));
    }

    let cache_root = match cache_dir {
        Some(dir) => PathBuf::from(dir),
        None => expand_tilde(&config.defaults.cache_dir),
    };

    // Secrets come from the environment; the config only names the variables.
    let credentials = Credentials {
        username: config::read_secret_env(&config.provider.username_env)?,
        password: config::read_secret_env(&config.provider.password_env)?,
    };
    let mongo_uri = config::read_secret_env(&config.mongo.uri_env)?;

    info!(
        courses = allow_list.len(),
        cache = %cache_root.display(),
        database = %config.mongo.database,
        "starting sync"
    );

    let reporter = CliProgress::new();

    reporter.phase("Logging in to provider");
    let provider = HttpCourseProvider::login(&config.provider.base_url, &credentials).await?;

    reporter.phase("Connecting to document store");
    let store = MongoStore::connect(&mongo_uri, &config.mongo.database).await?;

    let cache = ContentCache::new(cache_root);

    let report = sync_courses(&provider, &cache, &store, &allow_list, &reporter).await?;
    reporter.done();

    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!();
    println!("  Sync complete!");
    println!("  Courses:   {}", report.courses);
    println!(
        "  Languages: {} inserted / {} matched",
        report.languages.inserted, report.languages.matched
    );
    println!(
        "  Skills:    {} inserted / {} matched ({} modified)",
        report.skills.inserted, report.skills.matched, report.skills.modified
    );
    println!(
        "  Words:     {} inserted / {} matched ({} modified)",
        report.words.inserted, report.words.matched, report.words.modified
    );
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

/// Expand a leading `~/` against the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}

impl SyncProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn course_started(&self, course_id: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Course [{current}/{total}] {course_id}"));
    }

    fn skill_collected(&self, skill_id: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Collecting words [{current}/{total}] {skill_id}"));
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}
