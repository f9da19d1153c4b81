//! Session header scanning and fixed-field metadata parsing.
//!
//! A UCI EEG session file opens with a block of `#` comment lines:
//!
//! ```text
//! # co2a0000364.rd
//! # 120 trials, 64 chans, 416 samples 368 post_stim samples
//! # 3.906000 msecs uV
//! # S1 obj , trial 0
//! ```
//!
//! The header is a fixed-offset record, not a free-form comment: line 1
//! carries the subject id and the alcoholic/control flag, line 4 carries the
//! stimulus condition (object flag, match category, error flag). Offsets are
//! byte positions in the **raw** line, trailing newline included — the
//! subject id is `line[2 .. len-4]`, which strips `"# "` in front and
//! `".rd\n"` behind.
//!
//! A header that does not fit this shape (fewer than four comment lines, a
//! line too short for its field, a missing condition token) is an
//! unsupported header format and fails the whole import. An unrecognized
//! match-category *value* does not fail: it parses to `None`, matching the
//! source dataset's loader.
use std::fmt;
use std::io::BufRead;

use anyhow::{bail, Context, Result};

/// Comment/header marker. Lines starting with this byte are metadata or
/// mid-stream comments, never measurement rows.
pub const COMMENT_MARKER: u8 = b'#';

/// Minimum number of header lines before the first data row.
pub const MIN_HEADER_LINES: usize = 4;

// ── Match category ────────────────────────────────────────────────────────

/// Stimulus match condition from header line 4.
///
/// The dataset encodes three conditions: a single object (`obj`), a second
/// object matching the first (`match`), and a second object that does not
/// match (`nomatch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    NoMatch,
    Obj,
    Match,
}

impl MatchKind {
    /// Parse a condition token. Anything other than the three known tokens
    /// yields `None` — a silent gap inherited from the original loader, kept
    /// as-is rather than promoted to an error.
    pub fn parse(token: &str) -> Option<MatchKind> {
        match token {
            "nomatch" => Some(MatchKind::NoMatch),
            "obj" => Some(MatchKind::Obj),
            "match" => Some(MatchKind::Match),
            _ => None,
        }
    }

    /// The dataset's spelling of this condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::NoMatch => "nomatch",
            MatchKind::Obj => "obj",
            MatchKind::Match => "match",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Session metadata ──────────────────────────────────────────────────────

/// Per-session metadata extracted from the comment header.
///
/// Immutable once parsed; broadcast onto every measurement row by
/// [`crate::frame::LongFrame::from_rows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMeta {
    /// Subject identifier, e.g. `co2a0000364`.
    pub subject: String,
    /// True for alcoholic subjects (`co2a…`), false for controls (`co2c…`).
    pub alcoholic: bool,
    /// True when the trial presented the target object (`S1`).
    pub is_target_object: bool,
    /// Match condition; `None` when the header token is unrecognized.
    pub match_category: Option<MatchKind>,
    /// True when the trial is flagged as an error trial.
    pub has_error: bool,
}

impl SessionMeta {
    /// Parse session metadata from the buffered header lines.
    ///
    /// `lines` must hold the raw header lines exactly as read, trailing
    /// newlines retained — the fixed offsets below count them.
    pub fn parse(lines: &[String]) -> Result<SessionMeta> {
        if lines.len() < MIN_HEADER_LINES {
            bail!(
                "unsupported header format: expected at least {MIN_HEADER_LINES} \
                 comment lines, found {}",
                lines.len()
            );
        }
        let subject_line = lines[0].as_str();
        let condition_line = lines[3].as_str();

        Ok(SessionMeta {
            subject: parse_subject(subject_line)?,
            alcoholic: parse_alcoholic(subject_line)?,
            is_target_object: parse_object_flag(condition_line)?,
            match_category: parse_match(condition_line)?,
            has_error: parse_error_flag(condition_line),
        })
    }
}

/// Strip the header marker and surrounding spaces from both ends of a line.
/// The trailing newline is *not* stripped, so trailing-edge trimming stops
/// there — identical to the original loader's `strip('# ')`.
fn trim_marker(line: &str) -> &str {
    line.trim_matches(|c| c == '#' || c == ' ')
}

/// Subject id: bytes `[2 .. len-4]` of the raw first header line
/// (drops `"# "` and `".rd\n"`).
fn parse_subject(line: &str) -> Result<String> {
    let end = line.len().checked_sub(4).filter(|&e| e >= 2).ok_or_else(|| {
        anyhow::anyhow!("unsupported header format: subject line too short: {line:?}")
    })?;
    let subject = line
        .get(2..end)
        .with_context(|| format!("unsupported header format: subject line not ASCII: {line:?}"))?;
    Ok(subject.to_string())
}

/// Alcoholic flag: 4th character of the trimmed first header line is `'a'`
/// (`co2a…` = alcoholic, `co2c…` = control).
fn parse_alcoholic(line: &str) -> Result<bool> {
    let c = trim_marker(line).chars().nth(3).ok_or_else(|| {
        anyhow::anyhow!("unsupported header format: subject line too short for group flag: {line:?}")
    })?;
    Ok(c == 'a')
}

/// Object flag: 2nd character of the trimmed fourth header line is `'1'`
/// (the `S1`/`S2` stimulus code).
fn parse_object_flag(line: &str) -> Result<bool> {
    let c = trim_marker(line).chars().nth(1).ok_or_else(|| {
        anyhow::anyhow!("unsupported header format: condition line too short: {line:?}")
    })?;
    Ok(c == '1')
}

/// First comma segment of the trimmed condition line, split on single
/// spaces. Empty tokens are preserved — `"S1 obj "` splits into three tokens
/// with an empty third, and the error-flag rule below depends on that.
fn condition_tokens(line: &str) -> Vec<&str> {
    let segment = trim_marker(line).split(',').next().unwrap_or("");
    segment.split(' ').collect()
}

/// Match category: token 1 of the condition segment.
fn parse_match(line: &str) -> Result<Option<MatchKind>> {
    let tokens = condition_tokens(line);
    let token = tokens.get(1).ok_or_else(|| {
        anyhow::anyhow!("unsupported header format: condition line has no match token: {line:?}")
    })?;
    Ok(MatchKind::parse(token))
}

/// Error flag: the condition segment has exactly three tokens and the third
/// is `"err"`.
fn parse_error_flag(line: &str) -> bool {
    let tokens = condition_tokens(line);
    tokens.len() == 3 && tokens[2] == "err"
}

// ── Header scan ───────────────────────────────────────────────────────────

/// Result of scanning the leading comment block of a session stream.
#[derive(Debug)]
pub struct HeaderScan {
    /// Raw header lines, newline retained, in file order.
    pub lines: Vec<String>,
    /// The first non-comment line, already consumed from the reader. Row
    /// parsing starts with this line; `None` means the file is all header.
    pub first_data_line: Option<String>,
    /// Byte offset of the first data line within the stream.
    pub data_offset: u64,
}

/// Read lines while they start with [`COMMENT_MARKER`], buffering them as
/// the header. The first non-comment line is handed back instead of being
/// rewound: subsequent row parsing continues on the same reader with
/// `first_data_line` prepended, which is offset-equivalent to the original
/// loader's `tell()`/`seek()` dance without requiring `Seek`.
pub fn scan_header<R: BufRead>(reader: &mut R) -> Result<HeaderScan> {
    let mut lines = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .context("reading session header")?;
        if n == 0 {
            // EOF inside the header block.
            if lines.len() < MIN_HEADER_LINES {
                bail!(
                    "unsupported header format: stream ended after {} header line(s)",
                    lines.len()
                );
            }
            return Ok(HeaderScan { lines, first_data_line: None, data_offset: offset });
        }
        if line.as_bytes().first() == Some(&COMMENT_MARKER) {
            offset += n as u64;
            lines.push(line);
        } else {
            if lines.len() < MIN_HEADER_LINES {
                bail!(
                    "unsupported header format: expected at least {MIN_HEADER_LINES} \
                     comment lines before data, found {}",
                    lines.len()
                );
            }
            return Ok(HeaderScan {
                lines,
                first_data_line: Some(line),
                data_offset: offset,
            });
        }
    }
}
