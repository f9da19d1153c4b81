//! CSV serialization of both layouts.
//!
//! Serialization is a collaborator concern, not part of the importer: these
//! writers live behind the CLI and tests, and the importer itself never
//! touches disk.
use std::io::Write;

use anyhow::{Context, Result};

use crate::frame::{LongFrame, COLUMN_ORDER};
use crate::wide::WideFrame;

/// Write a long frame as CSV: one header row with the eight ordered column
/// names, then one record per row. An unset match category and a `NaN`
/// value serialize as empty fields.
pub fn write_long_csv<W: Write>(frame: &LongFrame, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMN_ORDER).context("writing long CSV header")?;

    for i in 0..frame.n_rows() {
        let match_field = frame.match_category[i].map_or("", |m| m.as_str());
        wtr.write_record([
            frame.subject.get(i).to_string(),
            frame.trial.get(i).to_string(),
            frame.alcoholic[i].to_string(),
            match_field.to_string(),
            frame.err[i].to_string(),
            frame.sensor.get(i).to_string(),
            frame.sample.get(i).to_string(),
            float_field(frame.value.get(i)),
        ])
        .with_context(|| format!("writing long CSV row {i}"))?;
    }
    wtr.flush().context("flushing long CSV")?;
    Ok(())
}

/// Write a wide frame as CSV: first column is `sample`, remaining columns
/// are the `/`-joined [`crate::wide::ColumnKey`] labels.
pub fn write_wide_csv<W: Write>(frame: &WideFrame, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(1 + frame.n_columns());
    header.push("sample".to_string());
    header.extend(frame.columns.iter().map(|k| k.label()));
    wtr.write_record(&header).context("writing wide CSV header")?;

    for (r, &sample) in frame.samples.iter().enumerate() {
        let mut record = Vec::with_capacity(1 + frame.n_columns());
        record.push(sample.to_string());
        for c in 0..frame.n_columns() {
            record.push(float_field(frame.values[[r, c]]));
        }
        wtr.write_record(&record)
            .with_context(|| format!("writing wide CSV row for sample {sample}"))?;
    }
    wtr.flush().context("flushing wide CSV")?;
    Ok(())
}

fn float_field(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::LongFrame;
    use crate::header::{MatchKind, SessionMeta};
    use crate::rows::Measurement;
    use crate::wide::pivot;

    fn sample_frame() -> LongFrame {
        let meta = SessionMeta {
            subject: "co2c0000337".to_string(),
            alcoholic: false,
            is_target_object: false,
            match_category: Some(MatchKind::Match),
            has_error: false,
        };
        let rows = vec![
            Measurement { trial: 0, sensor: "FP1".to_string(), sample: 0, value: -8.921 },
            Measurement { trial: 0, sensor: "FP1".to_string(), sample: 1, value: 0.305 },
        ];
        LongFrame::from_rows(&meta, &rows)
    }

    #[test]
    fn long_csv_has_ordered_header_and_rows() {
        let mut out = Vec::new();
        write_long_csv(&sample_frame(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "subject,trial,alcoholic,match,err,sensor,sample,value"
        );
        assert_eq!(lines.next().unwrap(), "co2c0000337,0,false,match,false,FP1,0,-8.921");
    }

    #[test]
    fn wide_csv_labels_columns() {
        let wide = pivot(&sample_frame());
        let mut out = Vec::new();
        write_wide_csv(&wide, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "sample,co2c0000337/0/false/match/false/FP1");
        assert_eq!(lines.next().unwrap(), "0,-8.921");
        assert_eq!(lines.next().unwrap(), "1,0.305");
    }
}
