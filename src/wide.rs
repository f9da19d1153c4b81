//! Wide (pivoted) layout.
//!
//! The wide frame puts `sample` on the rows and one column per distinct
//! `(subject, trial, alcoholic, match, err, sensor)` combination, with the
//! voltage reading as the cell. Duplicate cells are averaged and missing
//! cells are `NaN`, matching pivot-table semantics.
//!
//! One deliberate divergence from the source dataset's loader: an unset
//! match category (unrecognized header token) stays a live part of the
//! column key, labelled `-`. The original's pivot treated it as NaN and
//! dropped every such row, leaving an empty wide frame; here the session's
//! data survives with the category merely unset.
use std::collections::BTreeMap;

use ndarray::Array2;

use crate::frame::LongFrame;
use crate::header::MatchKind;

/// Column identity in the wide layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    pub subject: String,
    pub trial: u32,
    pub alcoholic: bool,
    pub match_category: Option<MatchKind>,
    pub err: bool,
    pub sensor: String,
}

impl ColumnKey {
    /// Compact single-string form, `/`-separated in column order, for CSV
    /// headers and log lines. An unset match category prints as `-`.
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.subject,
            self.trial,
            self.alcoholic,
            self.match_category.map_or("-", |m| m.as_str()),
            self.err,
            self.sensor,
        )
    }
}

/// One session pivoted into a `[n_samples, n_columns]` value matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct WideFrame {
    /// Sorted unique sample indices; row `r` of `values` is sample
    /// `samples[r]`.
    pub samples: Vec<u32>,
    /// Sorted unique column keys; column `c` of `values` is `columns[c]`.
    pub columns: Vec<ColumnKey>,
    /// Cell values; `NaN` where a (sample, key) combination never occurred.
    pub values: Array2<f64>,
}

impl WideFrame {
    /// Number of sample rows.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of metadata/sensor columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Cell for a given sample index and column key, if both exist.
    pub fn cell(&self, sample: u32, key: &ColumnKey) -> Option<f64> {
        let r = self.samples.binary_search(&sample).ok()?;
        let c = self.columns.binary_search(key).ok()?;
        Some(self.values[[r, c]])
    }
}

/// Pivot a long frame into the wide layout.
///
/// Sample indices and column keys are collected in sorted order, then every
/// long row is placed into its cell. A `(sample, key)` pair hit more than
/// once is averaged; one never hit stays `NaN`.
pub fn pivot(frame: &LongFrame) -> WideFrame {
    let n = frame.n_rows();

    let mut sample_ix: BTreeMap<u32, usize> = BTreeMap::new();
    let mut column_ix: BTreeMap<ColumnKey, usize> = BTreeMap::new();
    for i in 0..n {
        sample_ix.entry(frame.sample.get(i)).or_default();
        column_ix.entry(key_of(frame, i)).or_default();
    }
    for (r, slot) in sample_ix.values_mut().enumerate() {
        *slot = r;
    }
    for (c, slot) in column_ix.values_mut().enumerate() {
        *slot = c;
    }

    let shape = (sample_ix.len(), column_ix.len());
    let mut sums = Array2::<f64>::zeros(shape);
    let mut counts = Array2::<u32>::zeros(shape);

    for i in 0..n {
        let r = sample_ix[&frame.sample.get(i)];
        let c = column_ix[&key_of(frame, i)];
        sums[[r, c]] += frame.value.get(i);
        counts[[r, c]] += 1;
    }

    let values = ndarray::Zip::from(&sums)
        .and(&counts)
        .map_collect(|&s, &k| if k == 0 { f64::NAN } else { s / k as f64 });

    WideFrame {
        samples: sample_ix.keys().copied().collect(),
        columns: column_ix.keys().cloned().collect(),
        values,
    }
}

fn key_of(frame: &LongFrame, i: usize) -> ColumnKey {
    ColumnKey {
        subject: frame.subject.get(i).to_string(),
        trial: frame.trial.get(i),
        alcoholic: frame.alcoholic[i],
        match_category: frame.match_category[i],
        err: frame.err[i],
        sensor: frame.sensor.get(i).to_string(),
    }
}
