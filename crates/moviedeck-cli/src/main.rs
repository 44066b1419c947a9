//! moviedeck - TMDB movie browser for the terminal.

/// Application configuration (TOML).
mod config;
/// Tracing subscriber setup.
mod logging;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::state::format_rating;
use crate::tui::{BrowserSettings, Route, run_browser};
use moviedeck_api::links::{google_search_url, poster_url, youtube_trailer_url};
use moviedeck_api::tmdb::{MovieSummary, PopularParams, SearchMovieParams, TmdbApi, TmdbClient};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "moviedeck", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Append logs to this file (the browser discards logs otherwise).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular movies, search and view details interactively.
    Browse(BrowseArgs),
    /// Print the popular movies list.
    Popular(PopularArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Print the details of one movie.
    Details(DetailsArgs),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Generate a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Open the detail view of this TMDB movie ID.
    #[arg(long)]
    movie: Option<u64>,
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PopularArgs {
    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Response language (defaults to the configured language).
    #[arg(long)]
    language: Option<String>,

    /// Region filter (ISO 3166-1 code, e.g. `JP`).
    #[arg(long)]
    region: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Movie title to search for.
    #[arg(long, required = true)]
    query: String,

    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Response language (defaults to the configured language).
    #[arg(long)]
    language: Option<String>,

    /// Primary release year filter.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,

    /// Response language (defaults to the configured language).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path.
    Path,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir.map(PathBuf::as_path))?;
    tracing::debug!(path = %path.display(), "loading config");
    AppConfig::load(&path)
}

/// Non-empty environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builds a `TmdbClient` from the config and environment.
///
/// # Errors
///
/// Returns an error if no credential is available, `TMDB_BASE_URL` is not a
/// valid URL, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let credential =
        config.resolve_credential(env_var("TMDB_API_TOKEN"), env_var("TMDB_API_KEY"))?;

    let mut builder = TmdbClient::builder()
        .credential(credential)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

    if let Some(base) = env_var("TMDB_BASE_URL") {
        let base = if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        };
        let url = Url::parse(&base).with_context(|| format!("invalid TMDB_BASE_URL: {base}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Logs a movie list as a table.
fn log_movie_table(movies: &[MovieSummary]) {
    tracing::info!("ID\tYear\tRating\tTitle");
    for m in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            m.id,
            m.year().unwrap_or("-"),
            format_rating(m.vote_average),
            m.title,
        );
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the TUI fails.
#[instrument(skip_all)]
fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = Arc::new(build_tmdb_client(config)?);
    let settings = BrowserSettings {
        language: config.tmdb.language.clone(),
        include_adult: config.tmdb.include_adult,
        image_size: config.tmdb.image_size.clone(),
        debounce: Duration::from_millis(config.search.debounce_ms),
    };
    let route = args.movie.map_or(Route::Home, Route::Movie);

    tracing::info!(?route, "starting browser");
    run_browser(client, settings, route)
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_popular(args: &PopularArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut params = PopularParams::default().language(language).page(args.page);
    if let Some(region) = &args.region {
        params = params.region(region.as_str());
    }
    let response = client
        .popular_movies(&params)
        .await
        .context("TMDB movie/popular request failed")?;

    tracing::info!(
        "Popular Movies (page {}/{}, {} total)",
        response.page,
        response.total_pages,
        response.total_results
    );
    log_movie_table(&response.results);

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the TMDB client fails to build,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        bail!("search query must not be empty");
    }
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut params = SearchMovieParams::new(query)
        .language(language)
        .page(args.page)
        .include_adult(config.tmdb.include_adult);
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let response = client
        .search_movie(&params)
        .await
        .context("TMDB search/movie request failed")?;

    if response.results.is_empty() {
        tracing::info!("No movies found. Try different keywords.");
        return Ok(());
    }
    tracing::info!(
        "Search Results (page {}/{}, {} total)",
        response.page,
        response.total_pages,
        response.total_results
    );
    log_movie_table(&response.results);

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let movie = client
        .movie_details(args.id, language)
        .await
        .context("Movie details not found.")?;

    let year = movie.year();
    tracing::info!("{}", movie.title);
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("  {tagline}");
    }
    tracing::info!(
        "Release Date: {}",
        movie.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!("Rating: {}", format_rating(movie.vote_average));
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        tracing::info!("Runtime: {runtime} min");
    }
    if !movie.genres.is_empty() {
        let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        tracing::info!("Genres: {}", genres.join(", "));
    }
    tracing::info!(
        "Overview: {}",
        movie.overview_text().unwrap_or("No overview available.")
    );
    tracing::info!(
        "Poster: {}",
        poster_url(movie.poster_path.as_deref(), &config.tmdb.image_size)
    );
    tracing::info!("Google: {}", google_search_url(&movie.title, year)?);
    tracing::info!("Trailer: {}", youtube_trailer_url(&movie.title, year)?);

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `force`) or cannot be written.
fn run_config_init(dir: Option<&PathBuf>, force: bool) -> Result<()> {
    let path = resolve_config_path(dir.map(PathBuf::as_path))?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Runs the `config path` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved.
fn run_config_path(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir.map(PathBuf::as_path))?;
    tracing::info!("{}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "moviedeck", &mut io::stdout());
        return Ok(());
    }

    let interactive = matches!(cli.command, Commands::Browse(_));
    logging::init_tracing(cli.log_file.as_deref(), interactive)?;

    let dir = cli.dir.as_ref();
    match &cli.command {
        Commands::Browse(args) => run_browse(args, &load_config(dir)?),
        Commands::Popular(args) => run_popular(args, &load_config(dir)?).await,
        Commands::Search(args) => run_search(args, &load_config(dir)?).await,
        Commands::Details(args) => run_details(args, &load_config(dir)?).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init { force } => run_config_init(dir, force),
            ConfigSubcommands::Path => run_config_path(dir),
        },
        Commands::Completions(_) => Ok(()),
    }
}
