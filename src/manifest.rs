//! MedMNIST manifest builder.
//!
//! A MedMNIST export directory holds one headerless `<dataset>.csv` (as
//! written by the exporter's `save()`) plus the image files under
//! `<folder>/<dataset>/`. Each CSV row is `split, image-file, label…` with
//! positional columns. [`build_manifest`] turns that into a single labelled
//! manifest: positional columns renamed to `split, img` plus the dataset's
//! label names, image paths rewritten to be relative to the data folder,
//! written as one combined CSV with a header row and no index column.
//!
//! Downloading/exporting the dataset itself is an external collaborator's
//! job; a missing export CSV is a hard error here, never a trigger to fetch.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

// ── Dataset registry ──────────────────────────────────────────────────────

/// Static description of one MedMNIST dataset: its name and class labels in
/// positional order, mirroring the upstream `INFO` registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    pub name: &'static str,
    pub labels: &'static [&'static str],
}

pub const CHESTMNIST_LABELS: [&str; 14] = [
    "atelectasis",
    "cardiomegaly",
    "effusion",
    "infiltration",
    "mass",
    "nodule",
    "pneumonia",
    "pneumothorax",
    "consolidation",
    "edema",
    "emphysema",
    "fibrosis",
    "pleural",
    "hernia",
];

pub const PNEUMONIAMNIST_LABELS: [&str; 2] = ["normal", "pneumonia"];

pub const OCTMNIST_LABELS: [&str; 4] = [
    "choroidal neovascularization",
    "diabetic macular edema",
    "drusen",
    "normal",
];

pub const PATHMNIST_LABELS: [&str; 9] = [
    "adipose",
    "background",
    "debris",
    "lymphocytes",
    "mucus",
    "smooth muscle",
    "normal colon mucosa",
    "cancer-associated stroma",
    "colorectal adenocarcinoma epithelium",
];

/// Known datasets, keyed by their MedMNIST flag name.
pub const DATASETS: [DatasetInfo; 4] = [
    DatasetInfo { name: "chestmnist", labels: &CHESTMNIST_LABELS },
    DatasetInfo { name: "pneumoniamnist", labels: &PNEUMONIAMNIST_LABELS },
    DatasetInfo { name: "octmnist", labels: &OCTMNIST_LABELS },
    DatasetInfo { name: "pathmnist", labels: &PATHMNIST_LABELS },
];

/// Look up a dataset by name.
pub fn dataset_info(name: &str) -> Result<&'static DatasetInfo> {
    DATASETS.iter().find(|d| d.name == name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown dataset {name:?} (known: {})",
            DATASETS.iter().map(|d| d.name).collect::<Vec<_>>().join(", ")
        )
    })
}

// ── Manifest build ────────────────────────────────────────────────────────

/// Manifest builder settings. Defaults match the original dataset script:
/// `chestmnist` exported as PNGs under `data/`, manifest at
/// `data/dataset.csv`.
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Dataset flag name, e.g. `chestmnist`.
    pub dataset: String,
    /// Export folder holding `<dataset>.csv` and the image directory.
    pub folder: PathBuf,
    /// Image file extension the exporter wrote (informational; the CSV
    /// already names the files).
    pub postfix: String,
    /// Output path of the combined manifest.
    pub output: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            dataset: "chestmnist".to_string(),
            folder: PathBuf::from("data"),
            postfix: "png".to_string(),
            output: PathBuf::from("data").join("dataset.csv"),
        }
    }
}

/// Build the combined manifest CSV. Returns the number of image records
/// written.
pub fn build_manifest(cfg: &ManifestConfig) -> Result<usize> {
    let info = dataset_info(&cfg.dataset)?;
    let input = cfg.folder.join(format!("{}.csv", cfg.dataset));
    if !input.is_file() {
        bail!(
            "{} not found — export the {} splits (train/val/test) there first",
            input.display(),
            cfg.dataset
        );
    }

    let header: Vec<&str> =
        ["split", "img"].into_iter().chain(info.labels.iter().copied()).collect();
    let image_dir = cfg.folder.join(&cfg.dataset);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&input)
        .with_context(|| format!("opening {}", input.display()))?;
    let mut wtr = csv::Writer::from_path(&cfg.output)
        .with_context(|| format!("creating {}", cfg.output.display()))?;
    wtr.write_record(&header).context("writing manifest header")?;

    let mut written = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("reading {} row {i}", input.display()))?;
        if record.len() != header.len() {
            bail!(
                "{} row {i}: expected {} columns, found {}",
                input.display(),
                header.len(),
                record.len()
            );
        }
        let img = rewrite_image_path(&image_dir, &record[1]);
        let fields: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(c, f)| if c == 1 { img.clone() } else { f.to_string() })
            .collect();
        wtr.write_record(&fields)
            .with_context(|| format!("writing manifest row {i}"))?;
        written += 1;
    }
    wtr.flush().context("flushing manifest")?;
    Ok(written)
}

/// Prefix an exporter-relative image file with the image directory.
fn rewrite_image_path(image_dir: &Path, file: &str) -> String {
    image_dir.join(file).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_chestmnist() {
        let info = dataset_info("chestmnist").unwrap();
        assert_eq!(info.labels.len(), 14);
        assert_eq!(info.labels[0], "atelectasis");
        assert_eq!(info.labels[13], "hernia");
    }

    #[test]
    fn unknown_dataset_is_an_error() {
        let err = dataset_info("bloodmnist9000").unwrap_err();
        assert!(err.to_string().contains("unknown dataset"));
    }

    #[test]
    fn default_config_matches_original_script() {
        let cfg = ManifestConfig::default();
        assert_eq!(cfg.dataset, "chestmnist");
        assert_eq!(cfg.folder, PathBuf::from("data"));
        assert_eq!(cfg.postfix, "png");
        assert_eq!(cfg.output, PathBuf::from("data").join("dataset.csv"));
    }
}
