use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use eegtab::manifest::{build_manifest, ManifestConfig};

#[derive(Parser)]
#[command(
    name = "make-manifest",
    about = "Assemble a labelled CSV manifest from a MedMNIST image export"
)]
struct Args {
    /// Dataset flag name (chestmnist, pneumoniamnist, octmnist, pathmnist)
    #[arg(long, default_value = "chestmnist")]
    dataset: String,

    /// Export folder holding <dataset>.csv and the image directory
    #[arg(long, default_value = "data")]
    folder: PathBuf,

    /// Image file extension the exporter wrote
    #[arg(long, default_value = "png")]
    postfix: String,

    /// Output manifest path
    #[arg(long, default_value = "data/dataset.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = ManifestConfig {
        dataset: args.dataset,
        folder: args.folder,
        postfix: args.postfix,
        output: args.output,
    };

    let written = build_manifest(&cfg)?;
    println!("{written} records → {}", cfg.output.display());

    Ok(())
}
