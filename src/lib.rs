//! # eegtab — EEG session files as typed tabular frames
//!
//! `eegtab` imports single-session recordings from the UCI EEG Database
//! text format (the alcoholism study's `co2a0000364.rd`-style files) into
//! in-memory tables, plus a small companion that assembles a labelled CSV
//! manifest from a MedMNIST image export.
//!
//! ## Import pipeline
//!
//! ```text
//! co2a0000364.rd(.gz)
//!   │
//!   ├─ header::scan_header      buffer leading '#' lines, keep first data line
//!   ├─ header::SessionMeta      subject / alcoholic / object / match / err
//!   ├─ rows::read_rows          `trial sensor sample value` records
//!   ├─ frame::LongFrame         broadcast metadata, fixed column order
//!   ├─ optimize (optional)      narrow uints, f32 values, dictionary labels
//!   └─ layout
//!        ├─ Long  → 6-tuple row index, sensor stays a column
//!        └─ Wide  → wide::pivot: samples × (subject,…,sensor) matrix
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use eegtab::{import_session, open_session, ImportConfig, Layout, SessionTable};
//!
//! let mut reader = open_session("data/co2a0000364.rd.gz").unwrap();
//! let cfg = ImportConfig { layout: Layout::Wide, ..ImportConfig::default() };
//!
//! match import_session(&mut reader, &cfg).unwrap() {
//!     SessionTable::Wide(w) => {
//!         println!("{} samples × {} sensor columns", w.n_samples(), w.n_columns());
//!     }
//!     SessionTable::Long(l) => {
//!         println!("{} rows", l.n_rows());
//!     }
//! }
//! ```
//!
//! Each call is independent and stateless: it consumes one reader and
//! returns one freshly built table. Parsing is strict — a malformed header
//! or data row fails the whole import with no partial result.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

pub mod export;
pub mod frame;
pub mod header;
pub mod manifest;
pub mod rows;
pub mod wide;

pub use frame::LongFrame;
pub use header::{MatchKind, SessionMeta};
pub use wide::WideFrame;

// ── Import configuration ──────────────────────────────────────────────────

/// Output table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One row per sample point, indexed by
    /// `(subject, trial, alcoholic, match, err, sample)`.
    Long,
    /// Samples as rows, one column per
    /// `(subject, trial, alcoholic, match, err, sensor)` combination.
    Wide,
}

/// Settings for [`import_session`].
///
/// All fields are `pub`, so struct-update syntax works:
///
/// ```
/// use eegtab::{ImportConfig, Layout};
///
/// let cfg = ImportConfig {
///     layout: Layout::Long,
///     ..ImportConfig::default()
/// };
/// assert!(cfg.optimize);
/// ```
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Output layout.
    ///
    /// Default: [`Layout::Wide`].
    pub layout: Layout,

    /// Narrow column storage after parsing: smallest unsigned width for
    /// `trial`/`sample`, single-precision values, dictionary-encoded
    /// `sensor`/`subject` labels. Observable cell values are unchanged.
    ///
    /// Default: `true`.
    pub optimize: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig { layout: Layout::Wide, optimize: true }
    }
}

/// One imported session, in the requested layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionTable {
    Long(LongFrame),
    Wide(WideFrame),
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Import one session from a readable stream positioned at its first
/// header line.
///
/// Runs the full pipeline: header scan, fixed-field metadata parse, row
/// parse, metadata broadcast, optional storage narrowing, reshape. Errors
/// (unsupported header shape, malformed rows) propagate; nothing is
/// recovered internally.
pub fn import_session<R: BufRead>(reader: &mut R, cfg: &ImportConfig) -> Result<SessionTable> {
    let scan = header::scan_header(reader)?;
    let meta = header::SessionMeta::parse(&scan.lines)?;
    let rows = rows::read_rows(reader, scan.first_data_line.as_deref(), scan.lines.len())?;

    let mut frame = LongFrame::from_rows(&meta, &rows);
    if cfg.optimize {
        frame.optimize();
    }

    Ok(match cfg.layout {
        Layout::Wide => SessionTable::Wide(wide::pivot(&frame)),
        Layout::Long => SessionTable::Long(frame),
    })
}

/// Open a session file as a buffered reader, transparently decompressing
/// `.gz` files.
pub fn open_session<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
