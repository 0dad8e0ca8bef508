//! Music metadata crawler library
//!
//! This library backs the `tunecrawl` batch jobs. Each job authenticates
//! against one or more third-party music APIs (Spotify, Genius, Last.fm),
//! pages through results, optionally reconciles records across two providers
//! with fuzzy string matching and finally writes a flat CSV file.
//!
//! # Modules
//!
//! - `cli` - One linear batch job per subcommand
//! - `client` - Shared HTTP plumbing and the reconnect capability
//! - `config` - Environment loading and per-provider configuration values
//! - `errors` - Provider error type
//! - `genius` - Genius API client and lyric page scraping
//! - `lastfm` - Last.fm API client
//! - `pipeline` - Pagination, matching, batched lookup and chunked CSV output
//! - `spotify` - Spotify Web API client
//! - `types` - Provider payloads and output records
//! - `utils` - Argument normalisation and progress helpers

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod genius;
pub mod lastfm;
pub mod pipeline;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used by the batch jobs.
///
/// Jobs mix provider, configuration, CSV and I/O failures, so they box the
/// error. The boxed error keeps `Send + Sync` so it can cross `.await` points.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// ```
/// info!("Retrieving results for artist: {}", artist);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with status 1.
///
/// Only for failures the run cannot recover from. Partial output already
/// written stays on disk.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for per-record problems that do not stop the run, such as a lyric
/// page that could not be parsed or a reconnect after an authorization
/// failure.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
