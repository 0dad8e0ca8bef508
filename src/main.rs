use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunecrawl::{
    Res, cli, config, error, pipeline::similarity::SimilarityMetric, utils::normalize_artist_arg,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch Spotify audio features for a CSV of track ids
    Features(FeaturesArgs),

    /// Crawl lyrics for an artist, or for the Last.fm top tracks per tag
    Lyrics(LyricsArgs),

    /// Tag the tracks of Spotify playlists with Last.fm genres
    Genres(GenresArgs),

    /// Add a unique_pid column to songs<N>.csv files
    AddPid(AddPidArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FeaturesArgs {
    /// CSV with a trackid column [default: <data>/unique_tracks.csv]
    #[clap(long)]
    input: Option<PathBuf>,

    /// Output CSV [default: <output>/song_attribs.csv]
    #[clap(long)]
    output: Option<PathBuf>,

    /// Track ids per chunk
    #[clap(long, default_value_t = cli::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Number of rows in the input, for progress output
    #[clap(long)]
    rows: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct LyricsArgs {
    /// Artist to pull the discography for; words are joined with spaces
    #[clap(long, num_args = 1..)]
    artist: Option<Vec<String>>,

    /// Pages of top tracks per tag
    #[clap(long, default_value_t = 1)]
    pages: usize,

    /// Tracks kept from each page of top tracks
    #[clap(long)]
    top_n: Option<usize>,

    /// Similarity a match must exceed on artist and title [env: MATCH_THRESHOLD]
    #[clap(long, value_parser = parse_threshold_arg)]
    threshold: Option<f64>,

    /// String similarity metric [env: MATCH_METRIC]
    #[clap(long, value_enum)]
    metric: Option<SimilarityMetric>,

    /// Output CSV [default: <output>/<artist>.csv or <output>/tag_songs.csv]
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenresArgs {
    /// Exact playlist name; can be repeated
    #[clap(long = "playlist", action = ArgAction::Append)]
    playlists: Vec<String>,

    /// Output CSV [default: <output>/playlist_genres.csv]
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddPidArgs {
    /// Directory with songs<N>.csv files
    #[clap(long, default_value = "Songs")]
    dir: PathBuf,

    /// Output directory [default: <output>]
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_threshold_arg(value: &str) -> Result<f64, String> {
    config::parse_threshold(value).ok_or_else(|| format!("{} is not a number in [0, 1]", value))
}

async fn run(command: Command) -> Res<()> {
    let paths = config::paths();

    match command {
        Command::Features(args) => {
            cli::features(cli::FeaturesOptions {
                input: args
                    .input
                    .unwrap_or_else(|| paths.data_path.join("unique_tracks.csv")),
                output: args
                    .output
                    .unwrap_or_else(|| paths.output_path.join("song_attribs.csv")),
                chunk_size: args.chunk_size,
                rows: args.rows,
            })
            .await
        }
        Command::Lyrics(args) => {
            let mut matching = config::matching()?;
            if let Some(threshold) = args.threshold {
                matching.threshold = threshold;
            }
            if let Some(metric) = args.metric {
                matching.metric = metric;
            }

            let output = args.output.unwrap_or_else(|| match &args.artist {
                Some(words) => paths
                    .output_path
                    .join(format!("{}.csv", normalize_artist_arg(words).replace(' ', "_"))),
                None => paths.output_path.join("tag_songs.csv"),
            });

            cli::lyrics(cli::LyricsOptions {
                artist: args.artist,
                pages: args.pages,
                top_n: args.top_n,
                matching,
                output,
            })
            .await
        }
        Command::Genres(args) => {
            let playlists = if args.playlists.is_empty() {
                vec![cli::DEFAULT_PLAYLIST.to_string()]
            } else {
                args.playlists
            };

            cli::genres(cli::GenresOptions {
                playlists,
                output: args
                    .output
                    .unwrap_or_else(|| paths.output_path.join("playlist_genres.csv")),
            })
            .await
        }
        Command::AddPid(args) => {
            cli::add_pid(cli::AddPidOptions {
                dir: args.dir,
                output: args.output.unwrap_or(paths.output_path),
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        error!("{}", e);
    }
}
