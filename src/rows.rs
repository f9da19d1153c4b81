//! Measurement-row parsing.
//!
//! After the header, every non-comment line is one sample point:
//!
//! ```text
//! 0 FP1 0 -8.921
//! ```
//!
//! i.e. `trial sensor sample value`, whitespace-delimited. Interleaved `#`
//! lines (the per-sensor sub-headers in the UCI files) are skipped. Any
//! other shape is a fatal row-format error; there is no recovery and no
//! partial result.
use std::io::BufRead;

use anyhow::{bail, Context, Result};

use crate::header::COMMENT_MARKER;

/// One voltage reading at (`trial`, `sensor`, `sample`).
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub trial: u32,
    pub sensor: String,
    pub sample: u32,
    pub value: f64,
}

/// Parse all measurement rows from `reader`.
///
/// `first_line` is the line the header scan already consumed (see
/// [`crate::header::scan_header`]); `header_lines` is how many lines
/// preceded it, so error messages can name 1-based file line numbers.
pub fn read_rows<R: BufRead>(
    reader: &mut R,
    first_line: Option<&str>,
    header_lines: usize,
) -> Result<Vec<Measurement>> {
    let mut rows = Vec::new();
    let mut line_no = header_lines;

    if let Some(line) = first_line {
        line_no += 1;
        parse_line(line, line_no, &mut rows)?;
    }

    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).context("reading data rows")?;
        if n == 0 {
            break;
        }
        line_no += 1;
        parse_line(&line, line_no, &mut rows)?;
    }
    Ok(rows)
}

fn parse_line(line: &str, line_no: usize, rows: &mut Vec<Measurement>) -> Result<()> {
    if line.as_bytes().first() == Some(&COMMENT_MARKER) {
        return Ok(());
    }
    let trimmed = line.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        return Ok(());
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() != 4 {
        bail!(
            "line {line_no}: expected 4 fields (trial sensor sample value), found {}: {trimmed:?}",
            fields.len()
        );
    }

    let trial: u32 = fields[0]
        .parse()
        .with_context(|| format!("line {line_no}: bad trial number {:?}", fields[0]))?;
    let sample: u32 = fields[2]
        .parse()
        .with_context(|| format!("line {line_no}: bad sample index {:?}", fields[2]))?;
    let value: f64 = fields[3]
        .parse()
        .with_context(|| format!("line {line_no}: bad voltage value {:?}", fields[3]))?;

    rows.push(Measurement { trial, sensor: fields[1].to_string(), sample, value });
    Ok(())
}
