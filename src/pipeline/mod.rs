//! # Ingestion and reconciliation pipeline
//!
//! The provider-independent core shared by all batch jobs:
//!
//! ```text
//! PageSource ──> Paginator ──> records ──> reconcile (RecordMatcher) ──> BatchWriter
//!                                 │
//!                 BatchLookup ──> fetch_aligned ─────────────────────────┘
//! ```
//!
//! - [`paginator`] pulls pages from a provider until it signals the end
//! - [`batch`] resolves id lists in provider-sized batches, keeping one
//!   output per input id
//! - [`similarity`] and [`matcher`] decide whether a search hit from a second
//!   provider is the same song
//! - [`reconcile`] runs the matcher over a record set and drops unmatched
//!   records
//! - [`writer`] streams records to CSV chunk by chunk
//!
//! Everything runs sequentially; there is one in-flight provider call and
//! one writer per file at any time. Only authorization failures are retried,
//! once, after reconnecting the provider.

pub mod batch;
pub mod matcher;
pub mod paginator;
pub mod reconcile;
pub mod similarity;
pub mod writer;
