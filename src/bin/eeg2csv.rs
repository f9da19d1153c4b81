use anyhow::{bail, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use eegtab::export::{write_long_csv, write_wide_csv};
use eegtab::{import_session, open_session, ImportConfig, Layout, SessionTable};

#[derive(Parser)]
#[command(name = "eeg2csv", about = "Import one UCI EEG session file and export it as CSV")]
struct Args {
    /// Session file (.rd, or .rd.gz for gzipped input)
    #[arg(long)]
    input: PathBuf,

    /// Output CSV path
    #[arg(long)]
    output: PathBuf,

    /// Table layout: 'long' or 'wide' (default: wide)
    #[arg(long, default_value = "wide")]
    layout: String,

    /// Keep full-width column storage (u32/f64, plain strings)
    #[arg(long)]
    no_optimize: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let layout = match args.layout.as_str() {
        "long" => Layout::Long,
        "wide" => Layout::Wide,
        other => bail!("unknown layout {other:?} (expected 'long' or 'wide')"),
    };
    let cfg = ImportConfig { layout, optimize: !args.no_optimize };

    let mut reader = open_session(&args.input)?;
    let table = import_session(&mut reader, &cfg)?;

    let out = BufWriter::new(File::create(&args.output)?);
    match &table {
        SessionTable::Long(frame) => {
            println!("Imported {} rows (long layout)", frame.n_rows());
            write_long_csv(frame, out)?;
        }
        SessionTable::Wide(frame) => {
            println!(
                "Imported {} samples × {} columns (wide layout)",
                frame.n_samples(),
                frame.n_columns()
            );
            write_wide_csv(frame, out)?;
        }
    }
    println!("Written → {}", args.output.display());

    Ok(())
}
