use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs4::FileExt;

use crate::error::EngineError;
use crate::model::categories::RegulationCategory;
use crate::pipeline::stage4_assemble::UnifiedRecord;
use crate::report::json::{render_histogram_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{SummaryData, histogram_bars};

pub const LOCK_FILE_NAME: &str = ".kira-sircle.lock";

/// Unified table columns written after the gene id column.
pub const UNIFIED_COLUMNS: [&str; 5] = [
    "methylation",
    "rna",
    "protein",
    "category",
    "filtered_category",
];

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub records: &'a [UnifiedRecord],
    pub summary: &'a SummaryData,
    pub gene_id_column: &'a str,
    pub prefix: &'a str,
    pub keep_background_in_flow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub unified_csv: PathBuf,
    pub flow_csv: PathBuf,
    pub histogram_json: PathBuf,
    pub summary_json: PathBuf,
    pub report_txt: PathBuf,
}

impl OutputFiles {
    pub fn new(out_dir: &Path, prefix: &str) -> Self {
        Self {
            unified_csv: out_dir.join(format!("{prefix}.csv")),
            flow_csv: out_dir.join(format!("{prefix}_flow.csv")),
            histogram_json: out_dir.join(format!("{prefix}_histogram.json")),
            summary_json: out_dir.join(format!("{prefix}_summary.json")),
            report_txt: out_dir.join(format!("{prefix}_report.txt")),
        }
    }
}

/// Exclusive claim on an output directory for the lifetime of one run.
///
/// Held as an advisory lock on `.kira-sircle.lock`; the OS releases it when
/// the process exits, so a lock file left by a killed run does not block
/// later runs. The file itself stays and records the holder's pid.
#[derive(Debug)]
pub struct OutputLock {
    file: File,
    path: PathBuf,
}

impl OutputLock {
    pub fn acquire(out_dir: &Path) -> Result<Self, EngineError> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(LOCK_FILE_NAME);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        if let Err(err) = file.try_lock_exclusive() {
            return if err.kind() == fs4::lock_contended_error().kind() {
                Err(EngineError::OutputBusy {
                    dir: out_dir.to_path_buf(),
                    lock: path,
                })
            } else {
                Err(err.into())
            };
        }
        // dropping `file` on error releases the lock
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        tracing::debug!(lock = %path.display(), "acquired output lock");
        Ok(Self { file, path })
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), "failed to release output lock: {err}");
        }
    }
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> Result<OutputFiles, EngineError> {
    let _lock = OutputLock::acquire(out_dir)?;
    let files = OutputFiles::new(out_dir, input.prefix);

    write_unified_csv(input.records, input.gene_id_column, &files.unified_csv)?;
    write_flow_csv(input.records, input.keep_background_in_flow, &files.flow_csv)?;

    let bars = histogram_bars(input.records);
    write_text(&files.histogram_json, &render_histogram_json(&bars)?)?;
    write_text(&files.summary_json, &render_summary_json(input.summary)?)?;
    write_text(&files.report_txt, &render_report_text(input.summary))?;

    tracing::info!(
        out_dir = %out_dir.display(),
        rows = input.records.len(),
        "wrote reports"
    );
    Ok(files)
}

pub fn write_unified_csv(
    records: &[UnifiedRecord],
    gene_id_column: &str,
    path: &Path,
) -> Result<(), EngineError> {
    let mut w = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    w.write_record(std::iter::once(gene_id_column).chain(UNIFIED_COLUMNS))?;
    for record in records {
        w.write_record([
            record.gene_id.as_str(),
            record.meth_call.as_str(),
            record.rna_call.as_str(),
            record.prot_call.as_str(),
            record.category.as_str(),
            record.filtered_category.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Rows for a flow diagram; background rows are left out unless requested.
pub fn flow_rows(records: &[UnifiedRecord], keep_background: bool) -> Vec<[&'static str; 5]> {
    records
        .iter()
        .filter(|r| keep_background || r.filtered_category != RegulationCategory::Background)
        .map(|r| {
            [
                r.meth_call.as_str(),
                r.rna_call.as_str(),
                r.prot_call.as_str(),
                r.category.as_str(),
                r.filtered_category.as_str(),
            ]
        })
        .collect()
}

pub fn write_flow_csv(
    records: &[UnifiedRecord],
    keep_background: bool,
    path: &Path,
) -> Result<(), EngineError> {
    let mut w = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    w.write_record([
        "methylation",
        "rna",
        "protein",
        "category",
        "filtered_category",
    ])?;
    for row in flow_rows(records, keep_background) {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
