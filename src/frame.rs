//! Long-form columnar frame.
//!
//! [`LongFrame`] is the in-memory table built from one session: the parsed
//! measurement rows with the session metadata broadcast onto every row, in
//! the fixed column order `subject, trial, alcoholic, match, err, sensor,
//! sample, value`.
//!
//! Columns are typed, not stringly: integer columns carry an explicit width
//! ([`UIntColumn`]), the value column an explicit precision
//! ([`FloatColumn`]), and label columns are either plain strings or
//! dictionary-encoded ([`LabelColumn`]). The match column is an enum column
//! from construction. [`LongFrame::optimize`] narrows storage without
//! changing any observable cell value.
use crate::header::{MatchKind, SessionMeta};
use crate::rows::Measurement;

/// Column names in output order.
pub const COLUMN_ORDER: [&str; 8] =
    ["subject", "trial", "alcoholic", "match", "err", "sensor", "sample", "value"];

// ── Typed columns ─────────────────────────────────────────────────────────

/// Unsigned integer column with explicit storage width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UIntColumn {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl UIntColumn {
    pub fn len(&self) -> usize {
        match self {
            UIntColumn::U8(v) => v.len(),
            UIntColumn::U16(v) => v.len(),
            UIntColumn::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `i`, widened to `u32`.
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        match self {
            UIntColumn::U8(v) => v[i] as u32,
            UIntColumn::U16(v) => v[i] as u32,
            UIntColumn::U32(v) => v[i],
        }
    }

    /// Re-encode with the smallest width that losslessly holds every value.
    pub fn narrowed(&self) -> UIntColumn {
        let max = (0..self.len()).map(|i| self.get(i)).max().unwrap_or(0);
        if max <= u8::MAX as u32 {
            UIntColumn::U8((0..self.len()).map(|i| self.get(i) as u8).collect())
        } else if max <= u16::MAX as u32 {
            UIntColumn::U16((0..self.len()).map(|i| self.get(i) as u16).collect())
        } else {
            UIntColumn::U32((0..self.len()).map(|i| self.get(i)).collect())
        }
    }
}

/// Floating-point column with explicit precision.
#[derive(Debug, Clone, PartialEq)]
pub enum FloatColumn {
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl FloatColumn {
    pub fn len(&self) -> usize {
        match self {
            FloatColumn::F32(v) => v.len(),
            FloatColumn::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `i`, widened to `f64`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        match self {
            FloatColumn::F32(v) => v[i] as f64,
            FloatColumn::F64(v) => v[i],
        }
    }

    /// Re-encode as single precision.
    pub fn narrowed(&self) -> FloatColumn {
        match self {
            FloatColumn::F32(v) => FloatColumn::F32(v.clone()),
            FloatColumn::F64(v) => FloatColumn::F32(v.iter().map(|&x| x as f32).collect()),
        }
    }
}

/// String column, plain or dictionary-encoded.
///
/// Dictionary encoding is the explicit form of the categorical coercion:
/// `labels` is the finite label set in first-appearance order, `codes` holds
/// one index per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelColumn {
    Plain(Vec<String>),
    Dict { codes: Vec<u32>, labels: Vec<String> },
}

impl LabelColumn {
    pub fn len(&self) -> usize {
        match self {
            LabelColumn::Plain(v) => v.len(),
            LabelColumn::Dict { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label at `i`.
    pub fn get(&self, i: usize) -> &str {
        match self {
            LabelColumn::Plain(v) => &v[i],
            LabelColumn::Dict { codes, labels } => &labels[codes[i] as usize],
        }
    }

    /// Dictionary-encode; a no-op if already encoded.
    pub fn to_dict(&self) -> LabelColumn {
        match self {
            LabelColumn::Dict { .. } => self.clone(),
            LabelColumn::Plain(values) => {
                let mut labels: Vec<String> = Vec::new();
                let mut codes = Vec::with_capacity(values.len());
                for v in values {
                    let code = match labels.iter().position(|l| l == v) {
                        Some(p) => p as u32,
                        None => {
                            labels.push(v.clone());
                            (labels.len() - 1) as u32
                        }
                    };
                    codes.push(code);
                }
                LabelColumn::Dict { codes, labels }
            }
        }
    }
}

// ── Long frame ────────────────────────────────────────────────────────────

/// Row index key of the long layout: `(subject, trial, alcoholic, match,
/// err, sample)`. `sensor` is deliberately absent — see
/// [`LongFrame::index_keys`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexKey {
    pub subject: String,
    pub trial: u32,
    pub alcoholic: bool,
    pub match_category: Option<MatchKind>,
    pub err: bool,
    pub sample: u32,
}

/// One session as a long table: one row per sample point, metadata columns
/// broadcast from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct LongFrame {
    pub subject: LabelColumn,
    pub trial: UIntColumn,
    pub alcoholic: Vec<bool>,
    pub match_category: Vec<Option<MatchKind>>,
    pub err: Vec<bool>,
    pub sensor: LabelColumn,
    pub sample: UIntColumn,
    pub value: FloatColumn,
}

impl LongFrame {
    /// Build the frame from parsed rows, broadcasting `meta` onto every row.
    pub fn from_rows(meta: &SessionMeta, rows: &[Measurement]) -> LongFrame {
        let n = rows.len();
        LongFrame {
            subject: LabelColumn::Plain(vec![meta.subject.clone(); n]),
            trial: UIntColumn::U32(rows.iter().map(|r| r.trial).collect()),
            alcoholic: vec![meta.alcoholic; n],
            match_category: vec![meta.match_category; n],
            err: vec![meta.has_error; n],
            sensor: LabelColumn::Plain(rows.iter().map(|r| r.sensor.clone()).collect()),
            sample: UIntColumn::U32(rows.iter().map(|r| r.sample).collect()),
            value: FloatColumn::F64(rows.iter().map(|r| r.value).collect()),
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.sample.len()
    }

    /// Narrow storage: smallest unsigned width for `trial`/`sample`, single
    /// precision for `value`, dictionary encoding for `sensor`/`subject`.
    /// The match column is already an enum column, so there is nothing to
    /// narrow there. Observable values are unchanged.
    pub fn optimize(&mut self) {
        self.trial = self.trial.narrowed();
        self.sample = self.sample.narrowed();
        self.value = self.value.narrowed();
        self.sensor = self.sensor.to_dict();
        self.subject = self.subject.to_dict();
    }

    /// The long-layout row index tuples.
    ///
    /// The index omits `sensor`, so every sensor reading of the same sample
    /// shares a tuple and duplicates are expected. The source dataset's
    /// loader indexed the long frame this way; the duplication is kept
    /// as-is, with `sensor` left as a plain column.
    pub fn index_keys(&self) -> impl Iterator<Item = IndexKey> + '_ {
        (0..self.n_rows()).map(move |i| IndexKey {
            subject: self.subject.get(i).to_string(),
            trial: self.trial.get(i),
            alcoholic: self.alcoholic[i],
            match_category: self.match_category[i],
            err: self.err[i],
            sample: self.sample.get(i),
        })
    }
}
