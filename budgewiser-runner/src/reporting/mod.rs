//! Report packager — writes an estimate as a bundle of CSV and JSON files.
//!
//! Layout of one bundle, under `<output_dir>/`:
//! - `<run_id>/meta_input.csv`, `estimation_input.csv`, `estimation_output.csv`
//! - `<run_id>/direct_cost.csv`, `epc_cost.csv`, `installed_cost.csv`
//! - `<run_id>/estimate.json`
//! - `<run_id>.zip` holding the same files, deflate-compressed

pub mod archive;
pub mod tables;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::estimate::Estimate;

pub use archive::zip_bundle;

pub const META_INPUT_FILE: &str = "meta_input.csv";
pub const ESTIMATION_INPUT_FILE: &str = "estimation_input.csv";
pub const ESTIMATION_OUTPUT_FILE: &str = "estimation_output.csv";
pub const DIRECT_BREAKDOWN_FILE: &str = "direct_cost.csv";
pub const EPC_BREAKDOWN_FILE: &str = "epc_cost.csv";
pub const INSTALLED_BREAKDOWN_FILE: &str = "installed_cost.csv";
pub const ESTIMATE_JSON_FILE: &str = "estimate.json";

/// One rendered bundle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub name: &'static str,
    pub content: String,
}

/// Paths of every file written for one estimate.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub run_dir: PathBuf,
    pub meta_input: PathBuf,
    pub estimation_input: PathBuf,
    pub estimation_output: PathBuf,
    pub direct_breakdown: PathBuf,
    pub epc_breakdown: PathBuf,
    pub installed_breakdown: PathBuf,
    pub estimate_json: PathBuf,
    /// `<output_dir>/<run_id>.zip`, next to the run directory.
    pub archive: PathBuf,
}

impl ReportPaths {
    /// Files inside the run directory.
    pub fn files(&self) -> [&Path; 7] {
        [
            &self.meta_input,
            &self.estimation_input,
            &self.estimation_output,
            &self.direct_breakdown,
            &self.epc_breakdown,
            &self.installed_breakdown,
            &self.estimate_json,
        ]
    }
}

/// Render every bundle entry in archive order.
pub fn render_files(estimate: &Estimate) -> Result<Vec<ReportFile>> {
    let output = &estimate.output;
    let entries = [
        (META_INPUT_FILE, tables::meta_input_csv(estimate)?),
        (ESTIMATION_INPUT_FILE, tables::estimation_input_csv(&estimate.input)?),
        (ESTIMATION_OUTPUT_FILE, tables::estimation_output_csv(estimate)?),
        (DIRECT_BREAKDOWN_FILE, tables::breakdown_csv(&output.direct)?),
        (EPC_BREAKDOWN_FILE, tables::breakdown_csv(&output.epc)?),
        (INSTALLED_BREAKDOWN_FILE, tables::breakdown_csv(&output.installed)?),
        (ESTIMATE_JSON_FILE, export_json(estimate)?),
    ];
    Ok(entries
        .into_iter()
        .map(|(name, content)| ReportFile { name, content })
        .collect())
}

/// Writes report bundles below one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create report directory {}", output_dir.display()))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the full bundle and its zip archive. Re-running the same project
    /// with identical inputs overwrites the same run directory.
    pub fn write(&self, estimate: &Estimate) -> Result<ReportPaths> {
        let run_dir = self.output_dir.join(&estimate.meta.run_id);
        std::fs::create_dir_all(&run_dir)
            .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;

        let files = render_files(estimate)?;
        for file in &files {
            write_file(&run_dir.join(file.name), file.content.as_bytes())?;
        }

        let archive = self
            .output_dir
            .join(format!("{}.zip", estimate.meta.run_id));
        write_file(&archive, &zip_bundle(&files)?)?;

        let paths = ReportPaths {
            meta_input: run_dir.join(META_INPUT_FILE),
            estimation_input: run_dir.join(ESTIMATION_INPUT_FILE),
            estimation_output: run_dir.join(ESTIMATION_OUTPUT_FILE),
            direct_breakdown: run_dir.join(DIRECT_BREAKDOWN_FILE),
            epc_breakdown: run_dir.join(EPC_BREAKDOWN_FILE),
            installed_breakdown: run_dir.join(INSTALLED_BREAKDOWN_FILE),
            estimate_json: run_dir.join(ESTIMATE_JSON_FILE),
            archive,
            run_dir,
        };

        tracing::info!(
            run_dir = %paths.run_dir.display(),
            archive = %paths.archive.display(),
            "report written"
        );
        Ok(paths)
    }
}

/// Serialize an `Estimate` to pretty JSON.
pub fn export_json(estimate: &Estimate) -> Result<String> {
    serde_json::to_string_pretty(estimate).context("failed to serialize estimate to JSON")
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote report file");
    Ok(())
}
