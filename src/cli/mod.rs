//! # CLI Module
//!
//! One batch job per subcommand. Every job is a straight line over the
//! [`crate::pipeline`] building blocks:
//!
//! - [`features`] - track ids from a CSV → Spotify audio features → CSV,
//!   chunk by chunk
//! - [`lyrics`] - Genius discography of one artist, or Last.fm top tracks per
//!   tag reconciled against Genius, plus scraped lyrics → CSV
//! - [`genres`] - Spotify playlist tracks → Last.fm tags → CSV
//! - [`add_pid`] - `songs<N>.csv` files → same files with a `unique_pid`
//!   column
//!
//! Jobs print `START:` and `END:` timestamps around the run and finish with
//! a table of record counts per stage. They return errors instead of
//! exiting; the binary decides how to report them.
//!
//! ```text
//! config ──▶ provider clients ──▶ Paginator / fetch_aligned
//!                                     │
//!                                     ▼
//!                           reconcile (lyrics only)
//!                                     │
//!                                     ▼
//!                               BatchWriter
//! ```

mod features;
mod genres;
mod lyrics;
mod pid;

use std::path::Path;

use tabled::Table;

use crate::{types::SummaryRow, utils};

pub use features::{DEFAULT_CHUNK_SIZE, FeaturesOptions, features};
pub use genres::{DEFAULT_PLAYLIST, GenresOptions, genres};
pub use lyrics::{LyricsOptions, lyrics};
pub use pid::{AddPidOptions, add_pid};

fn start() {
    println!("START: {}", utils::timestamp());
}

fn finish(summary: Vec<SummaryRow>) {
    println!("{}", Table::new(summary));
    println!("END: {}", utils::timestamp());
}

async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => async_fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
