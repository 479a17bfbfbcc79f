use crate::data::ContactProfile;
use crate::outreach::outreach_template;
use crate::pipeline::PipelineOutput;
use crate::utils::config::ReportConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const TEMPLATE_SEPARATOR: &str = "\n\n----------------------------------------\n\n";

/// Consumer of a finished run's results
pub trait Exporter {
    fn export(&self, output: &PipelineOutput, report: &ReportConfig) -> Result<()>;
}

/// Writes CSV tables and the dashboard JSON into a directory
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Write one CSV table. An empty table is skipped and any file left by an earlier run is removed.
    fn write_table<T: Serialize>(&self, file_name: &str, rows: &[T]) -> Result<()> {
        let path = self.output_dir.join(file_name);
        if rows.is_empty() {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove stale {}", path.display()))?;
            }
            info!(path = %path.display(), "No rows, table skipped");
            return Ok(());
        }

        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(file, rows).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = rows.len(), "Saved table");
        Ok(())
    }

    fn write_templates(&self, contacts: &[ContactProfile]) -> Result<()> {
        let path = self.output_dir.join("outreach_templates.txt");
        let text = contacts
            .iter()
            .map(outreach_template)
            .collect::<Vec<_>>()
            .join(TEMPLATE_SEPARATOR);
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), templates = contacts.len(), "Saved outreach templates");
        Ok(())
    }
}

impl Exporter for FileExporter {
    fn export(&self, output: &PipelineOutput, report: &ReportConfig) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        self.write_table("flips.csv", &output.flips)?;
        self.write_table("investors.csv", &output.investors)?;
        self.write_table("contacts.csv", &output.contacts)?;
        self.write_templates(&output.contacts)?;

        let path = self.output_dir.join("dashboard_data.json");
        let json = serde_json::to_string_pretty(&output.dashboard(report))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Saved dashboard data");

        Ok(())
    }
}

/// Serialize rows as CSV with a header derived from the row type
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
